//! Image processing — pure Rust, fonts embedded.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image` decoders + EXIF orientation |
//! | **EXIF metadata** | `kamadak-exif`, flattened through a [`TagRegistry`] |
//! | **Backdrop** | downscale + `imageops::blur` + wash |
//! | **Caption** | `rusttype` |
//! | **Encode → JPEG** | `JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for frame geometry (unit testable)
//! - **Parameters**: Data structures describing what to paint
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend
//! - **EXIF reader**: [`MetadataExtractor`] trait + [`ExifExtractor`]

pub mod backend;
mod calculations;
pub mod exif_reader;
pub mod operations;
mod params;
pub mod rust_backend;
mod typeset;

pub use backend::{BackendError, ImageBackend, ImageHandle};
pub use calculations::{
    DETAIL_FONT_SCALE, LayoutGeometry, Orientation, calculate_fill_dimensions, compute_layout,
};
pub use exif_reader::{ExifExtractor, ExtractError, MetadataExtractor, TagRegistry};
pub use operations::{RenderSettings, RenderedOutput, plan_frame, render_frame};
pub use params::{ComposeParams, FrameStyle, Palette, ParseFrameStyleError, Quality, Wash};
pub use rust_backend::RustBackend;
