//! Capture metadata as a flat tag-name → value mapping.
//!
//! The extractor (see [`imaging::exif_reader`](crate::imaging::exif_reader))
//! flattens whatever EXIF it finds into a [`MetadataMap`]. Nothing downstream
//! knows about IFDs, rationals or byte orders: values are either text, a
//! single number, or a list of numbers.
//!
//! ## Presence
//!
//! A tag counts as *present* only when it carries something printable:
//!
//! | Value | Present when |
//! |---|---|
//! | `Text` | non-empty after NUL characters are stripped |
//! | `Number` | finite and non-zero |
//! | `Numbers` | at least one finite entry |
//!
//! Cameras pad ASCII fields with NULs and write zero for "unknown" focal
//! lengths, so both collapse to "absent" here instead of leaking into the
//! caption as `"\0\0"` or `"0mm"`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag names as they appear in a [`MetadataMap`].
pub mod tags {
    pub const MAKE: &str = "Make";
    pub const MODEL: &str = "Model";
    pub const LENS_MODEL: &str = "LensModel";
    pub const FOCAL_LENGTH_35MM: &str = "FocalLengthIn35mmFilm";
    pub const F_NUMBER: &str = "FNumber";
    pub const EXPOSURE_TIME: &str = "ExposureTime";
    /// Pre-formatted exposure time, used when no numeric value exists.
    pub const EXPOSURE_TIME_STRING: &str = "ExposureTimeString";
    pub const ISO: &str = "ISOSpeedRatings";
}

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Number(f64),
    Numbers(Vec<f64>),
    Text(String),
}

impl MetadataValue {
    /// Printable form of the value, or `None` when it is not present.
    ///
    /// Numbers use their shortest decimal form (`50`, `1.8`, `0.005`);
    /// number lists are comma-joined like `100,200`.
    pub fn display_text(&self) -> Option<String> {
        match self {
            MetadataValue::Text(s) => {
                let cleaned = strip_nul(s);
                (!cleaned.is_empty()).then_some(cleaned)
            }
            MetadataValue::Number(n) => {
                (n.is_finite() && *n != 0.0).then(|| format_number(*n))
            }
            MetadataValue::Numbers(ns) => {
                let parts: Vec<String> = ns
                    .iter()
                    .filter(|n| n.is_finite())
                    .map(|n| format_number(*n))
                    .collect();
                (!parts.is_empty()).then(|| parts.join(","))
            }
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Number(value)
    }
}

impl From<u32> for MetadataValue {
    fn from(value: u32) -> Self {
        MetadataValue::Number(value as f64)
    }
}

impl From<Vec<f64>> for MetadataValue {
    fn from(value: Vec<f64>) -> Self {
        MetadataValue::Numbers(value)
    }
}

/// Flat mapping of tag name to value. Keys are never guaranteed present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataMap(BTreeMap<String, MetadataValue>);

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<String>, value: impl Into<MetadataValue>) {
        self.0.insert(tag.into(), value.into());
    }

    pub fn get(&self, tag: &str) -> Option<&MetadataValue> {
        self.0.get(tag)
    }

    /// Printable value of `tag`, `None` when absent or not present.
    pub fn text(&self, tag: &str) -> Option<String> {
        self.get(tag).and_then(MetadataValue::display_text)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The map shown to users: itself, or `{"Make": "No Exif"}` when empty.
    pub fn or_placeholder(&self) -> MetadataMap {
        if self.is_empty() {
            let mut placeholder = MetadataMap::new();
            placeholder.insert(tags::MAKE, NO_METADATA);
            placeholder
        } else {
            self.clone()
        }
    }
}

impl<K: Into<String>, V: Into<MetadataValue>> FromIterator<(K, V)> for MetadataMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = MetadataMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Indicator shown in place of an empty metadata map.
pub const NO_METADATA: &str = "No Exif";

/// Shortest decimal rendering of a number (`50.0` → `"50"`).
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

fn strip_nul(s: &str) -> String {
    s.chars().filter(|&c| c != '\0').collect()
}
