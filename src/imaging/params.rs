//! Parameter types for frame rendering.
//!
//! These structs describe *what* to draw, not *how* to draw it. They are the
//! interface between [`operations`](super::operations) (which decides what the
//! frame looks like) and the [`backend`](super::backend) (which does the pixel
//! work). Tests swap in a recording backend and assert on these values alone.
//!
//! ## Types
//!
//! - [`FrameStyle`] — White / Blur / Black background treatment.
//! - [`Palette`] — title and detail text colors for a style.
//! - [`Wash`] — translucent overlay applied on top of the blurred backdrop.
//! - [`Quality`] — JPEG encoding quality (1–100, default 92). Clamped on construction.
//! - [`ComposeParams`] — everything the backend needs to paint one canvas.

use super::backend::ImageHandle;
use super::calculations::LayoutGeometry;
use crate::caption::Caption;
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(92)
    }
}

/// Background treatment of the frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStyle {
    /// Solid white canvas.
    #[default]
    White,
    /// The photo itself, blurred and washed out with white.
    Blur,
    /// The blurred photo darkened with a near-black wash.
    Black,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown frame style '{0}' (expected white, blur or black)")]
pub struct ParseFrameStyleError(String);

impl FrameStyle {
    pub const ALL: [FrameStyle; 3] = [FrameStyle::White, FrameStyle::Blur, FrameStyle::Black];

    pub fn as_str(self) -> &'static str {
        match self {
            FrameStyle::White => "white",
            FrameStyle::Blur => "blur",
            FrameStyle::Black => "black",
        }
    }

    /// Text colors chosen for contrast against this style's background.
    pub fn palette(self) -> Palette {
        match self {
            FrameStyle::White | FrameStyle::Blur => Palette {
                title: Rgb([0x00, 0x00, 0x00]),
                detail: Rgb([0x74, 0x74, 0x74]),
            },
            FrameStyle::Black => Palette {
                title: Rgb([0xff, 0xff, 0xff]),
                detail: Rgb([0xcc, 0xcc, 0xcc]),
            },
        }
    }

    /// Overlay for the blurred backdrop, `None` for a solid white canvas.
    pub fn wash(self) -> Option<Wash> {
        match self {
            FrameStyle::White => None,
            FrameStyle::Blur => Some(Wash {
                color: Rgb([0xff, 0xff, 0xff]),
                opacity: 0.5,
            }),
            FrameStyle::Black => Some(Wash {
                color: Rgb([0x14, 0x14, 0x14]),
                opacity: 0.5,
            }),
        }
    }
}

impl fmt::Display for FrameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameStyle {
    type Err = ParseFrameStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FrameStyle::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseFrameStyleError(s.to_string()))
    }
}

/// Caption text colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub title: Rgb<u8>,
    pub detail: Rgb<u8>,
}

/// A flat color blended over the whole backdrop at `opacity` (0.0–1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wash {
    pub color: Rgb<u8>,
    pub opacity: f32,
}

/// Everything needed to paint one framed canvas.
#[derive(Debug, Clone)]
pub struct ComposeParams<'a> {
    pub source: &'a ImageHandle,
    pub caption: &'a Caption,
    pub geometry: LayoutGeometry,
    pub style: FrameStyle,
    /// Backdrop blur radius in source pixels (only used by washed styles).
    pub blur_radius: f32,
}

impl ComposeParams<'_> {
    pub fn palette(&self) -> Palette {
        self.style.palette()
    }
}
