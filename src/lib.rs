//! # exif-frame
//!
//! Put a photo in a frame with its capture settings written underneath.
//!
//! ```text
//!   bytes ──▶ decode ─────────────┐
//!        └──▶ EXIF → caption ─────┼──▶ layout ──▶ compose ──▶ JPEG
//!                  (editable)     │
//!                    frame style ─┘
//! ```
//!
//! The caption is derived once per photo from its EXIF tags (make, model,
//! lens, focal length, aperture, shutter speed, ISO) and can then be edited
//! freely. Every edit re-renders from the original decoded pixels.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`metadata`] | Flat tag-name → value map and the rules for which values count as present |
//! | [`caption`] | Title/detail derivation from a metadata map |
//! | [`imaging`] | Layout geometry, EXIF extraction, compositing and JPEG encoding |
//! | [`session`] | Edit state machine: upload, caption edits, style switches, download |
//! | [`config`] | `config.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Proportional Layout
//!
//! Margins, caption band and font sizes are fractions of the source
//! dimensions, never fixed pixel values. A phone snapshot and a 60MP export
//! get the same look; see [`imaging::compute_layout`].
//!
//! ## Native-Size Inset
//!
//! The photo is drawn unscaled. The canvas grows around it instead, so the
//! framed output never loses resolution.
//!
//! ## Embedded Fonts
//!
//! DejaVu Sans (bold for the title, book for the detail) is compiled into the
//! binary. Rendering needs no system fonts and is byte-for-byte reproducible.
//! `config.toml` can point at other faces.
//!
//! ## Backend Trait
//!
//! All pixel work goes through [`imaging::ImageBackend`]. The session and the
//! render pipeline are tested against a recording mock; only the backend's
//! own tests paint real pixels.

pub mod caption;
pub mod config;
pub mod imaging;
pub mod metadata;
pub mod output;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
