//! Frame configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by whatever the user file sets; everything else keeps its
//! default.
//!
//! ## Config File Location
//!
//! `config.toml` in the working directory is picked up automatically.
//! `--config <PATH>` points at any other file instead.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [frame]
//! style = "white"           # white | blur | black
//!
//! [blur]
//! radius = 300.0            # Backdrop blur radius in source pixels
//!
//! [output]
//! quality = 92              # JPEG quality (1-100)
//! file_name = "processed-frame.jpeg"
//!
//! [fonts]
//! title = "/path/to/Bold.ttf"     # Replaces the embedded bold face
//! detail = "/path/to/Regular.ttf" # Replaces the embedded regular face
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [frame]
//! style = "black"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::operations::{DEFAULT_BLUR_RADIUS, DEFAULT_FILE_NAME};
use crate::imaging::{FrameStyle, Quality, RenderSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Frame configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    /// Style every new photo starts with.
    pub frame: FrameSection,
    /// Backdrop blur for the blur and black styles.
    pub blur: BlurConfig,
    /// JPEG encoding and the suggested file name.
    pub output: OutputConfig,
    /// Optional replacements for the embedded faces.
    pub fonts: FontsConfig,
}

impl FrameConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if !self.blur.radius.is_finite() || self.blur.radius <= 0.0 {
            return Err(ConfigError::Validation(
                "blur.radius must be a positive number".into(),
            ));
        }
        if self.output.file_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.file_name must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Settings handed to every render.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            quality: Quality::new(self.output.quality),
            blur_radius: self.blur.radius,
            file_name: self.output.file_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameSection {
    pub style: FrameStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlurConfig {
    /// Blur radius in source pixels. Larger photos want larger radii.
    pub radius: f32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BLUR_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// TrueType/OpenType file for the title line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<PathBuf>,
    /// TrueType/OpenType file for the detail line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<PathBuf>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(FrameConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    read_toml(&config_path).map(Some)
}

fn read_toml(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<FrameConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: FrameConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<FrameConfig, ConfigError> {
    let overlay = load_raw_config(dir)?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Load config from an explicit file. Unlike [`load_config`], a missing
/// file is an error.
pub fn load_config_file(path: &Path) -> Result<FrameConfig, ConfigError> {
    let overlay = read_toml(path)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# exif-frame configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# config.toml in the working directory is read automatically;
# pass --config <PATH> to use another file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Frame
# ---------------------------------------------------------------------------
[frame]
# Background every photo starts with: "white", "blur" or "black".
# "blur" and "black" paint a blurred copy of the photo behind it.
style = "white"

# ---------------------------------------------------------------------------
# Backdrop blur (blur and black styles)
# ---------------------------------------------------------------------------
[blur]
# Blur radius in source pixels.
radius = 300.0

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# JPEG quality (1 = worst, 100 = best).
quality = 92

# File name written by `frame` when --output is not given.
file_name = "processed-frame.jpeg"

# ---------------------------------------------------------------------------
# Fonts
# ---------------------------------------------------------------------------
[fonts]
# DejaVu Sans is built in. Point these at TrueType/OpenType files to
# replace the title (bold) or detail (regular) face.
# title = "/usr/share/fonts/truetype/inter/Inter-Bold.ttf"
# detail = "/usr/share/fonts/truetype/inter/Inter-Regular.ttf"
"##
}
