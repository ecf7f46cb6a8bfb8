//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take the caption and settings, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend, ImageHandle};
use super::calculations::compute_layout;
use super::params::{ComposeParams, FrameStyle, Quality};
use crate::caption::Caption;
use std::time::Instant;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Default name offered when saving a framed photo.
pub const DEFAULT_FILE_NAME: &str = "processed-frame.jpeg";

/// Default backdrop blur radius, in source pixels.
pub const DEFAULT_BLUR_RADIUS: f32 = 300.0;

/// Knobs that don't change per edit.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub quality: Quality,
    pub blur_radius: f32,
    pub file_name: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            blur_radius: DEFAULT_BLUR_RADIUS,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

/// An encoded framed photo ready to preview or save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// Plan a frame without painting it.
///
/// Useful for testing parameter generation.
pub fn plan_frame<'a>(
    image: &'a ImageHandle,
    caption: &'a Caption,
    style: FrameStyle,
    settings: &RenderSettings,
) -> ComposeParams<'a> {
    ComposeParams {
        source: image,
        caption,
        geometry: compute_layout(image.width(), image.height()),
        style,
        blur_radius: settings.blur_radius,
    }
}

/// Compose and encode one framed photo.
///
/// Always starts from the original decoded image; nothing from a previous
/// render is reused.
pub fn render_frame(
    backend: &impl ImageBackend,
    image: &ImageHandle,
    caption: &Caption,
    style: FrameStyle,
    settings: &RenderSettings,
) -> Result<RenderedOutput> {
    let started = Instant::now();
    let params = plan_frame(image, caption, style, settings);
    let canvas = backend.compose(&params)?;
    let bytes = backend.encode(&canvas, settings.quality)?;

    log::debug!(
        "Rendered {}x{} {} frame ({} bytes) in {:?}",
        params.geometry.canvas_width,
        params.geometry.canvas_height,
        style,
        bytes.len(),
        started.elapsed()
    );

    Ok(RenderedOutput {
        bytes,
        file_name: settings.file_name.clone(),
    })
}
