//! EXIF extraction with `kamadak-exif`.
//!
//! The reader walks the primary image's IFDs (IFD0 plus the Exif and GPS
//! sub-IFDs it points to) and flattens every *named* tag into a
//! [`MetadataMap`]. Tag names come from a [`TagRegistry`]: a static table
//! passed to the extractor explicitly, so tests and alternative front ends
//! can narrow or widen it without touching global state.
//!
//! Thumbnail IFDs are skipped; so are tags the registry doesn't name.
//!
//! A file without EXIF is not an error: extraction yields an empty map.

use crate::metadata::{MetadataMap, MetadataValue};
use exif::{In, Reader, Tag, Value};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error while reading metadata: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed metadata: {0}")]
    Malformed(String),
}

/// Anything that can turn encoded image bytes into a metadata map.
pub trait MetadataExtractor {
    /// An empty map is a valid result.
    fn extract(&self, bytes: &[u8]) -> Result<MetadataMap, ExtractError>;
}

/// Immutable EXIF tag → name table.
#[derive(Debug)]
pub struct TagRegistry {
    entries: &'static [(Tag, &'static str)],
}

static STANDARD_TAGS: &[(Tag, &str)] = &[
    // IFD0
    (Tag::Make, "Make"),
    (Tag::Model, "Model"),
    (Tag::Orientation, "Orientation"),
    (Tag::XResolution, "XResolution"),
    (Tag::YResolution, "YResolution"),
    (Tag::ResolutionUnit, "ResolutionUnit"),
    (Tag::Software, "Software"),
    (Tag::DateTime, "DateTime"),
    (Tag::Artist, "Artist"),
    (Tag::Copyright, "Copyright"),
    (Tag::ImageDescription, "ImageDescription"),
    // Exif IFD
    (Tag::ExposureTime, "ExposureTime"),
    (Tag::FNumber, "FNumber"),
    (Tag::ExposureProgram, "ExposureProgram"),
    (Tag::PhotographicSensitivity, "ISOSpeedRatings"),
    (Tag::DateTimeOriginal, "DateTimeOriginal"),
    (Tag::DateTimeDigitized, "DateTimeDigitized"),
    (Tag::ShutterSpeedValue, "ShutterSpeedValue"),
    (Tag::ApertureValue, "ApertureValue"),
    (Tag::BrightnessValue, "BrightnessValue"),
    (Tag::ExposureBiasValue, "ExposureBias"),
    (Tag::MaxApertureValue, "MaxApertureValue"),
    (Tag::SubjectDistance, "SubjectDistance"),
    (Tag::MeteringMode, "MeteringMode"),
    (Tag::LightSource, "LightSource"),
    (Tag::Flash, "Flash"),
    (Tag::FocalLength, "FocalLength"),
    (Tag::ColorSpace, "ColorSpace"),
    (Tag::PixelXDimension, "PixelXDimension"),
    (Tag::PixelYDimension, "PixelYDimension"),
    (Tag::SensingMethod, "SensingMethod"),
    (Tag::ExposureMode, "ExposureMode"),
    (Tag::WhiteBalance, "WhiteBalance"),
    (Tag::DigitalZoomRatio, "DigitalZoomRatio"),
    (Tag::FocalLengthIn35mmFilm, "FocalLengthIn35mmFilm"),
    (Tag::SceneCaptureType, "SceneCaptureType"),
    (Tag::Contrast, "Contrast"),
    (Tag::Saturation, "Saturation"),
    (Tag::Sharpness, "Sharpness"),
    (Tag::BodySerialNumber, "BodySerialNumber"),
    (Tag::LensSpecification, "LensSpecification"),
    (Tag::LensMake, "LensMake"),
    (Tag::LensModel, "LensModel"),
    (Tag::LensSerialNumber, "LensSerialNumber"),
    // GPS IFD
    (Tag::GPSLatitudeRef, "GPSLatitudeRef"),
    (Tag::GPSLatitude, "GPSLatitude"),
    (Tag::GPSLongitudeRef, "GPSLongitudeRef"),
    (Tag::GPSLongitude, "GPSLongitude"),
    (Tag::GPSAltitudeRef, "GPSAltitudeRef"),
    (Tag::GPSAltitude, "GPSAltitude"),
];

static STANDARD: TagRegistry = TagRegistry::new(STANDARD_TAGS);

impl TagRegistry {
    pub const fn new(entries: &'static [(Tag, &'static str)]) -> Self {
        Self { entries }
    }

    /// The built-in table: camera body, exposure, lens and GPS tags.
    pub fn standard() -> &'static TagRegistry {
        &STANDARD
    }

    pub fn name_of(&self, tag: Tag) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, name)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// [`MetadataExtractor`] backed by `kamadak-exif`.
#[derive(Debug, Clone, Copy)]
pub struct ExifExtractor {
    registry: &'static TagRegistry,
}

impl ExifExtractor {
    pub fn new(registry: &'static TagRegistry) -> Self {
        Self { registry }
    }
}

impl Default for ExifExtractor {
    fn default() -> Self {
        Self::new(TagRegistry::standard())
    }
}

impl MetadataExtractor for ExifExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<MetadataMap, ExtractError> {
        let exif = match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
            Ok(exif) => exif,
            Err(exif::Error::Io(e)) => return Err(ExtractError::Io(e)),
            Err(exif::Error::NotFound(what)) => {
                log::debug!("No EXIF data found ({what})");
                return Ok(MetadataMap::new());
            }
            Err(exif::Error::InvalidFormat(what)) => {
                log::debug!("Unreadable EXIF container ({what})");
                return Ok(MetadataMap::new());
            }
            Err(e) => return Err(ExtractError::Malformed(e.to_string())),
        };

        let mut map = MetadataMap::new();
        for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
            let Some(name) = self.registry.name_of(field.tag) else {
                continue;
            };
            if let Some(value) = convert_value(&field.value) {
                map.insert(name, value);
            }
        }
        log::debug!("Extracted {} EXIF fields", map.len());
        Ok(map)
    }
}

/// Flatten an EXIF value: ASCII → text, numbers → one number or a list.
///
/// Opaque (`Undefined`) and unknown values have no printable form and are
/// dropped, as are non-finite rationals (zero denominators).
fn convert_value(value: &Value) -> Option<MetadataValue> {
    let numbers: Vec<f64> = match value {
        Value::Ascii(parts) => {
            let text = parts
                .iter()
                .map(|p| String::from_utf8_lossy(p).into_owned())
                .collect::<Vec<_>>()
                .join(" ");
            return Some(MetadataValue::Text(text));
        }
        Value::Byte(v) => v.iter().map(|&n| n as f64).collect(),
        Value::Short(v) => v.iter().map(|&n| n as f64).collect(),
        Value::Long(v) => v.iter().map(|&n| n as f64).collect(),
        Value::SByte(v) => v.iter().map(|&n| n as f64).collect(),
        Value::SShort(v) => v.iter().map(|&n| n as f64).collect(),
        Value::SLong(v) => v.iter().map(|&n| n as f64).collect(),
        Value::Rational(v) => v.iter().map(|r| r.to_f64()).collect(),
        Value::SRational(v) => v.iter().map(|r| r.to_f64()).collect(),
        Value::Float(v) => v.iter().map(|&n| n as f64).collect(),
        Value::Double(v) => v.clone(),
        _ => return None,
    };

    let mut finite: Vec<f64> = numbers.into_iter().filter(|n| n.is_finite()).collect();
    match finite.len() {
        0 => None,
        1 => finite.pop().map(MetadataValue::Number),
        _ => Some(MetadataValue::Numbers(finite)),
    }
}
