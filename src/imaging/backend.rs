//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: decode, compose and encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, fonts
//! embedded. Tests use the recording `MockBackend` in this module so
//! orchestration logic can be checked without painting any pixels.

use super::params::{ComposeParams, Quality};
use image::{DynamicImage, RgbaImage};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Font error: {0}")]
    Font(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// A decoded source photo.
///
/// Pixels are shared and immutable: cloning the handle is cheap and nothing
/// can draw into it. A new upload replaces the handle wholesale.
#[derive(Clone)]
pub struct ImageHandle {
    pixels: Arc<RgbaImage>,
}

impl ImageHandle {
    pub fn new(image: DynamicImage) -> Self {
        Self::from_rgba(image.into_rgba8())
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Whether both handles refer to the same decoded pixels.
    pub fn same_image(&self, other: &ImageHandle) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Trait for image backends.
///
/// Every backend implements all three operations so the session and the
/// render pipeline stay backend-agnostic.
pub trait ImageBackend {
    /// Decode an uploaded file into pixels.
    fn decode(&self, bytes: &[u8]) -> Result<ImageHandle, BackendError>;

    /// Paint background, inset photo and caption onto a fresh canvas.
    fn compose(&self, params: &ComposeParams<'_>) -> Result<RgbaImage, BackendError>;

    /// Encode a finished canvas as JPEG.
    fn encode(&self, canvas: &RgbaImage, quality: Quality) -> Result<Vec<u8>, BackendError>;
}
