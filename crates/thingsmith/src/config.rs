//! Model-wide settings.
//!
//! A [`ModelConfig`] is built once, validated, and passed by reference into
//! every builder that needs it. It can be loaded from a TOML file:
//!
//! ```toml
//! segments = 64
//! overlap = 0.01
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of polygon segments for round shapes.
pub const DEFAULT_SEGMENTS: u32 = 33;

/// Errors from loading or validating a [`ModelConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML or has unknown keys.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Resolution and tolerance settings shared by all builders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelConfig {
    segments: u32,
    overlap: f64,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawModelConfig {
    segments: u32,
    overlap: f64,
}

impl Default for RawModelConfig {
    fn default() -> Self {
        let ModelConfig { segments, overlap } = ModelConfig::default();
        Self { segments, overlap }
    }
}

impl ModelConfig {
    /// Validated settings.
    ///
    /// `segments` must be at least 3; `overlap` must lie strictly between 0 and 1.
    pub fn new(segments: u32, overlap: f64) -> Result<Self, ConfigError> {
        if segments < 3 {
            return Err(ConfigError::Invalid(format!(
                "segments must be at least 3, got {segments}"
            )));
        }
        if !(overlap > 0.0 && overlap < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "overlap must be in (0, 1), got {overlap}"
            )));
        }
        Ok(Self { segments, overlap })
    }

    /// Parse settings from TOML text; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawModelConfig = toml::from_str(text)?;
        Self::new(raw.segments, raw.overlap)
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "loaded model config");
        Ok(config)
    }

    /// Polygon segments for round shapes without their own resolution.
    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Distance cutting tools extend past the faces they cut through.
    pub fn overlap(&self) -> f64 {
        self.overlap
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS,
            overlap: thingsmith_math::OVERLAP,
        }
    }
}
