//! Caption text rendering with `rusttype`.
//!
//! Sizes are CSS-style pixel sizes: the *em* is `px` tall, the same way a
//! browser treats `font: 82.5px Inter`. rusttype's [`Scale`] measures the
//! ascent-to-descent height instead, so [`em_scale`] converts between them.
//!
//! Lines are drawn centered on `cx` with a "middle" baseline: `cy` is the
//! vertical center of the line's em box, not the alphabetic baseline.

use super::backend::BackendError;
use image::{Rgb, RgbaImage};
use rusttype::{Font, Scale, point};

static EMBEDDED_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");
static EMBEDDED_REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Bold,
    Regular,
}

/// The two faces used by captions: bold for the title, regular for the detail.
pub struct Typeface {
    bold: Font<'static>,
    regular: Font<'static>,
}

impl Typeface {
    /// DejaVu Sans (bold + book), compiled into the binary.
    pub fn embedded() -> Result<Self, BackendError> {
        Ok(Self {
            bold: parse_static(EMBEDDED_BOLD, "embedded bold face")?,
            regular: parse_static(EMBEDDED_REGULAR, "embedded regular face")?,
        })
    }

    /// Build from raw TrueType/OpenType data.
    pub fn from_data(bold: Vec<u8>, regular: Vec<u8>) -> Result<Self, BackendError> {
        Ok(Self {
            bold: parse_owned(bold, "bold face")?,
            regular: parse_owned(regular, "regular face")?,
        })
    }

    pub fn font(&self, weight: Weight) -> &Font<'static> {
        match weight {
            Weight::Bold => &self.bold,
            Weight::Regular => &self.regular,
        }
    }

    /// Embedded data for one weight, used when only the other is overridden.
    pub fn embedded_data(weight: Weight) -> Vec<u8> {
        match weight {
            Weight::Bold => EMBEDDED_BOLD.to_vec(),
            Weight::Regular => EMBEDDED_REGULAR.to_vec(),
        }
    }
}

fn parse_static(data: &'static [u8], what: &str) -> Result<Font<'static>, BackendError> {
    Font::try_from_bytes(data).ok_or_else(|| BackendError::Font(format!("invalid {what}")))
}

fn parse_owned(data: Vec<u8>, what: &str) -> Result<Font<'static>, BackendError> {
    Font::try_from_vec(data).ok_or_else(|| BackendError::Font(format!("invalid {what}")))
}

/// rusttype scale whose em square is `px` pixels tall.
pub fn em_scale(font: &Font<'_>, px: f32) -> Scale {
    let units = font.v_metrics_unscaled();
    let height_units = units.ascent - units.descent;
    let per_em = font.units_per_em() as f32;
    if height_units <= 0.0 || per_em <= 0.0 {
        return Scale::uniform(px);
    }
    Scale::uniform(px * height_units / per_em)
}

/// Advance width of `text` at `px`, kerning included.
pub fn text_width(font: &Font<'_>, px: f32, text: &str) -> f32 {
    let scale = em_scale(font, px);
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Draw `text` centered on (`cx`, `cy`) with a middle baseline.
///
/// Coverage is alpha-blended over whatever is already on the canvas; pixels
/// outside the canvas are clipped. Empty text draws nothing.
pub fn draw_text_centered(
    canvas: &mut RgbaImage,
    font: &Font<'_>,
    px: f32,
    cx: f32,
    cy: f32,
    color: Rgb<u8>,
    text: &str,
) {
    if text.is_empty() || px <= 0.0 {
        return;
    }

    let scale = em_scale(font, px);
    let v_metrics = font.v_metrics(scale);
    let start_x = cx - text_width(font, px, text) / 2.0;
    // Middle of the em box: halfway between ascent and descent (descent < 0)
    let baseline_y = cy + (v_metrics.ascent + v_metrics.descent) / 2.0;

    let (width, height) = canvas.dimensions();
    for glyph in font.layout(text, scale, point(start_x, baseline_y)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let x = gx as i32 + bb.min.x;
            let y = gy as i32 + bb.min.y;
            if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                return;
            }
            if coverage <= 0.0 {
                return;
            }
            let dst = canvas.get_pixel_mut(x as u32, y as u32);
            let a = coverage.min(1.0);
            let inv = 1.0 - a;
            for c in 0..3 {
                dst.0[c] = (color.0[c] as f32 * a + dst.0[c] as f32 * inv).round() as u8;
            }
            dst.0[3] = 255;
        });
    }
}
