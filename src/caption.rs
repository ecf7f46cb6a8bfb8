//! Caption derivation: metadata → two lines of text.
//!
//! ```text
//! title:   Make  Model  /  LensModel
//! detail:  50mm  f/1.8  1/200s  ISO400
//! ```
//!
//! Every piece is optional. Missing fields disappear together with their
//! separator, so the lines never start with a gap or contain doubled ones.
//! Both lines stay editable afterwards; see [`session`](crate::session).

use crate::metadata::{MetadataMap, MetadataValue, format_number, tags};
use serde::{Deserialize, Serialize};

/// Gap between fields on both lines.
pub const FIELD_SEPARATOR: &str = "  ";
/// Gap between the camera body and the lens on the title line.
pub const LENS_SEPARATOR: &str = "  /  ";

/// The editable title/detail pair drawn under the photo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub title: String,
    pub detail: String,
}

impl Caption {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.detail.is_empty()
    }
}

/// Build the caption for a metadata map. Never fails; an empty map gives an
/// empty caption.
pub fn build_caption(metadata: &MetadataMap) -> Caption {
    Caption {
        title: title_line(metadata),
        detail: detail_line(metadata),
    }
}

fn title_line(metadata: &MetadataMap) -> String {
    let body = join_present([metadata.text(tags::MAKE), metadata.text(tags::MODEL)]);

    match metadata.text(tags::LENS_MODEL) {
        Some(lens) if body.is_empty() => lens,
        Some(lens) => format!("{body}{LENS_SEPARATOR}{lens}"),
        None => body,
    }
}

fn detail_line(metadata: &MetadataMap) -> String {
    join_present([
        metadata
            .text(tags::FOCAL_LENGTH_35MM)
            .map(|v| format!("{v}mm")),
        metadata.text(tags::F_NUMBER).map(|v| format!("f/{v}")),
        format_exposure_time(metadata),
        metadata.text(tags::ISO).map(|v| format!("ISO{v}")),
    ])
}

/// Exposure token with its trailing `s`, e.g. `1/200s`, `2s`, `2.5s`.
///
/// - numeric `ExposureTime >= 1` → seconds as-is
/// - numeric `0 < ExposureTime < 1` → `1/round(1/t)`
/// - textual `ExposureTime` → verbatim
/// - otherwise → `ExposureTimeString`, if any
pub fn format_exposure_time(metadata: &MetadataMap) -> Option<String> {
    let seconds = match metadata.get(tags::EXPOSURE_TIME) {
        Some(MetadataValue::Number(t)) if t.is_finite() && *t >= 1.0 => Some(format_number(*t)),
        Some(MetadataValue::Number(t)) if t.is_finite() && *t > 0.0 => {
            Some(format!("1/{}", format_number((1.0 / t).round())))
        }
        Some(MetadataValue::Text(_)) => metadata.text(tags::EXPOSURE_TIME),
        _ => None,
    };

    seconds
        .or_else(|| metadata.text(tags::EXPOSURE_TIME_STRING))
        .map(|s| format!("{s}s"))
}

fn join_present<const N: usize>(parts: [Option<String>; N]) -> String {
    parts
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}
