//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary, fonts included.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders), EXIF orientation applied |
//! | Backdrop | `image::imageops::resize` + `crop_imm` + `blur` on a downscaled copy |
//! | Inset | `image::imageops::overlay` at native size |
//! | Caption | `rusttype` glyph coverage, see [`typeset`](super::typeset) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{BackendError, ImageBackend, ImageHandle};
use super::calculations::calculate_fill_dimensions;
use super::params::{ComposeParams, Quality, Wash};
use super::typeset::{Typeface, Weight, draw_text_centered};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::metadata::Orientation;
use image::{
    DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageReader, Rgb, Rgba,
    RgbaImage,
};
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

/// Blur sigma applied to the downscaled backdrop. The backdrop is shrunk by
/// `radius / BACKDROP_SIGMA` before blurring, which keeps a 300px blur cheap.
const BACKDROP_SIGMA: f32 = 6.0;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Largest width or height a baseline JPEG can carry.
pub const JPEG_MAX_DIMENSION: u32 = u16::MAX as u32;

/// Pure Rust backend using the `image` and `rusttype` crates.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend {
    typeface: Typeface,
}

impl RustBackend {
    /// Backend with the embedded DejaVu faces.
    pub fn new() -> Result<Self, BackendError> {
        Ok(Self {
            typeface: Typeface::embedded()?,
        })
    }

    /// Backend with caller-supplied font data.
    pub fn with_fonts(bold: Vec<u8>, regular: Vec<u8>) -> Result<Self, BackendError> {
        Ok(Self {
            typeface: Typeface::from_data(bold, regular)?,
        })
    }

    /// Backend with optional font files; a missing path keeps the embedded face.
    pub fn from_font_files(
        title: Option<&Path>,
        detail: Option<&Path>,
    ) -> Result<Self, BackendError> {
        if title.is_none() && detail.is_none() {
            return Self::new();
        }
        let bold = match title {
            Some(path) => std::fs::read(path)?,
            None => Typeface::embedded_data(Weight::Bold),
        };
        let regular = match detail {
            Some(path) => std::fs::read(path)?,
            None => Typeface::embedded_data(Weight::Regular),
        };
        Self::with_fonts(bold, regular)
    }
}

/// Decode an encoded image and apply its EXIF orientation.
fn decode_oriented(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_decoder()
        .map_err(|e| BackendError::Decode(e.to_string()))?;
    let orientation = decoder
        .orientation()
        .unwrap_or(Orientation::NoTransforms);
    let mut image =
        DynamicImage::from_decoder(decoder).map_err(|e| BackendError::Decode(e.to_string()))?;
    image.apply_orientation(orientation);
    Ok(image)
}

/// The source, scaled to cover the canvas, blurred and washed.
///
/// Work happens on a copy shrunk by `radius / BACKDROP_SIGMA`, then the
/// result is scaled back up to the exact canvas size.
fn blurred_backdrop(source: &RgbaImage, canvas: (u32, u32), radius: f32, wash: Wash) -> RgbaImage {
    let (canvas_w, canvas_h) = canvas;
    // Transparent pixels carry arbitrary RGB; settle them on the wash color first
    let source = flatten(source, wash.color);
    let source = source.as_ref();
    let factor = (radius / BACKDROP_SIGMA).max(1.0);
    let small = (
        ((canvas_w as f32 / factor).round() as u32).max(1),
        ((canvas_h as f32 / factor).round() as u32).max(1),
    );

    // Fill-resize then center-crop to the small canvas
    let (fill_w, fill_h) = calculate_fill_dimensions(source.dimensions(), small);
    let filled = imageops::resize(source, fill_w, fill_h, FilterType::Triangle);
    let cropped = imageops::crop_imm(
        &filled,
        (fill_w - small.0) / 2,
        (fill_h - small.1) / 2,
        small.0,
        small.1,
    )
    .to_image();

    let sigma = radius / factor;
    let blurred = if sigma > 0.0 {
        imageops::blur(&cropped, sigma)
    } else {
        cropped
    };

    let mut backdrop = imageops::resize(&blurred, canvas_w, canvas_h, FilterType::Triangle);
    apply_wash(&mut backdrop, wash);
    backdrop
}

/// Composite a translucent image over an opaque background. Opaque images
/// are returned as-is.
fn flatten(image: &RgbaImage, background: Rgb<u8>) -> Cow<'_, RgbaImage> {
    if image.pixels().all(|p| p.0[3] == 255) {
        return Cow::Borrowed(image);
    }
    let mut flat = image.clone();
    for pixel in flat.pixels_mut() {
        let a = pixel.0[3] as f32 / 255.0;
        for c in 0..3 {
            pixel.0[c] =
                (pixel.0[c] as f32 * a + background.0[c] as f32 * (1.0 - a)).round() as u8;
        }
        pixel.0[3] = 255;
    }
    Cow::Owned(flat)
}

fn apply_wash(image: &mut RgbaImage, wash: Wash) {
    let a = wash.opacity.clamp(0.0, 1.0);
    let inv = 1.0 - a;
    for pixel in image.pixels_mut() {
        for c in 0..3 {
            pixel.0[c] = (wash.color.0[c] as f32 * a + pixel.0[c] as f32 * inv).round() as u8;
        }
        pixel.0[3] = 255;
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<ImageHandle, BackendError> {
        let image = decode_oriented(bytes)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(BackendError::Decode("image has no pixels".to_string()));
        }
        Ok(ImageHandle::new(image))
    }

    fn compose(&self, params: &ComposeParams<'_>) -> Result<RgbaImage, BackendError> {
        let g = &params.geometry;
        let canvas_size = (g.canvas_width, g.canvas_height);
        let source = params.source.pixels();

        let mut canvas = match params.style.wash() {
            None => RgbaImage::from_pixel(g.canvas_width, g.canvas_height, WHITE),
            Some(wash) => blurred_backdrop(source, canvas_size, params.blur_radius, wash),
        };

        let (x, y) = g.inset_origin();
        imageops::overlay(&mut canvas, source, x, y);

        let palette = params.palette();
        let cx = g.text_center_x() as f32;
        draw_text_centered(
            &mut canvas,
            self.typeface.font(Weight::Bold),
            g.base_font_size as f32,
            cx,
            g.title_baseline() as f32,
            palette.title,
            &params.caption.title,
        );
        draw_text_centered(
            &mut canvas,
            self.typeface.font(Weight::Regular),
            g.detail_font_size() as f32,
            cx,
            g.detail_baseline() as f32,
            palette.detail,
            &params.caption.detail,
        );

        Ok(canvas)
    }

    fn encode(&self, canvas: &RgbaImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
        let (width, height) = canvas.dimensions();
        if width > JPEG_MAX_DIMENSION || height > JPEG_MAX_DIMENSION {
            return Err(BackendError::Encode(format!(
                "{width}x{height} canvas exceeds the JPEG limit of {JPEG_MAX_DIMENSION} pixels per side"
            )));
        }
        let rgb = DynamicImage::ImageRgba8(canvas.clone()).into_rgb8();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality.value() as u8)
            .write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| BackendError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}
