//! Pure calculation functions for frame geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Everything is proportional to the source dimensions so a caption looks the
//! same on a 1000px scan and a 60MP raw export:
//!
//! ```text
//!            ┌──────────────────────────────┐
//!            │  margin = 0.025 × W          │
//!            │  ┌────────────────────────┐  │
//!            │  │                        │  │
//!            │  │      source  W × H     │  │
//!            │  │                        │  │
//!            │  └────────────────────────┘  │
//!            │        title (bold)          │  ← caption band
//!            │        detail                │    0.25 × H (landscape)
//!            └──────────────────────────────┘    0.17 × W (portrait)
//! ```

/// Side, top and bottom gap around the photo, relative to its width.
const MARGIN_RATIO: f64 = 0.025;

const LANDSCAPE_BAND_RATIO: f64 = 0.25;
const PORTRAIT_BAND_RATIO: f64 = 0.17;

const LANDSCAPE_FONT_RATIO: f64 = 0.0275;
const PORTRAIT_FONT_RATIO: f64 = 0.02;

const LANDSCAPE_SPACING_RATIO: f64 = 0.005;
const PORTRAIT_SPACING_RATIO: f64 = 0.0045;

/// Detail line size relative to the title.
pub const DETAIL_FONT_SCALE: f64 = 0.8;

/// Landscape when strictly wider than tall; squares count as portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn of(width: u32, height: u32) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Margins, canvas size and text placement for one render.
///
/// Derived from the source dimensions alone and recomputed on every render.
/// Vertical text positions are "middle" baselines: the vertical center of
/// each line's em box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGeometry {
    pub orientation: Orientation,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub horizontal_margin: f64,
    pub vertical_margin: f64,
    /// Height of the caption band below the photo (excluding the regular margin).
    pub bottom_margin: f64,
    /// Title font size in pixels.
    pub base_font_size: f64,
    pub line_spacing: f64,
    /// Vertical middle of the caption band.
    pub text_center_y: f64,
}

impl LayoutGeometry {
    pub fn detail_font_size(&self) -> f64 {
        self.base_font_size * DETAIL_FONT_SCALE
    }

    pub fn text_center_x(&self) -> f64 {
        self.canvas_width as f64 / 2.0
    }

    pub fn title_baseline(&self) -> f64 {
        self.text_center_y - self.line_spacing - self.base_font_size / 2.0
    }

    pub fn detail_baseline(&self) -> f64 {
        self.text_center_y + self.line_spacing + self.base_font_size / 2.0
    }

    /// Top-left pixel where the unscaled source is drawn.
    pub fn inset_origin(&self) -> (i64, i64) {
        (
            self.horizontal_margin.round() as i64,
            self.vertical_margin.round() as i64,
        )
    }
}

/// Compute the frame geometry for a `width × height` source.
///
/// # Examples
/// ```
/// # use exif_frame::imaging::compute_layout;
/// let layout = compute_layout(4000, 3000);
/// assert_eq!((layout.canvas_width, layout.canvas_height), (4200, 3950));
/// ```
pub fn compute_layout(width: u32, height: u32) -> LayoutGeometry {
    let orientation = Orientation::of(width, height);
    let (w, h) = (width as f64, height as f64);

    let margin = w * MARGIN_RATIO;
    let (bottom_margin, base_font_size, line_spacing) = match orientation {
        Orientation::Landscape => (
            h * LANDSCAPE_BAND_RATIO,
            h * LANDSCAPE_FONT_RATIO,
            h * LANDSCAPE_SPACING_RATIO,
        ),
        Orientation::Portrait => (
            w * PORTRAIT_BAND_RATIO,
            w * PORTRAIT_FONT_RATIO,
            w * PORTRAIT_SPACING_RATIO,
        ),
    };

    // Round once here; every later position is measured against the
    // integer canvas that actually gets allocated.
    let canvas_width = (w + 2.0 * margin).round() as u32;
    let canvas_height = (h + 2.0 * margin + bottom_margin).round() as u32;
    let text_center_y = canvas_height as f64 - (bottom_margin + 2.0 * margin) / 2.0;

    LayoutGeometry {
        orientation,
        canvas_width,
        canvas_height,
        horizontal_margin: margin,
        vertical_margin: margin,
        bottom_margin,
        base_font_size,
        line_spacing,
        text_center_y,
    }
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may exceed.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Target area dimensions (width, height)
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = (h as f64 * src_aspect).round() as u32;
        (w.max(tgt_w), h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = (w as f64 / src_aspect).round() as u32;
        (w, h.max(tgt_h))
    }
}
