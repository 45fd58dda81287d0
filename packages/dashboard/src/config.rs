//! Engine configuration.
//!
//! Defaults are embedded from `config/default.toml`. An override file only
//! needs the keys it changes; everything else keeps its default.

use std::path::Path;

use dispo_map_analytics::TrendPolicy;
use dispo_map_geocoder::DEFAULT_JITTER_SCALE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sparkline::SparklineFrame;

/// Embedded default configuration document.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Errors loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The override file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid TOML or has mistyped values.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Coordinate resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Width in degrees of the jitter box around a city centroid.
    pub jitter_scale: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            jitter_scale: DEFAULT_JITTER_SCALE,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `[resolver]` section.
    pub resolver: ResolverConfig,
    /// `[trend]` section.
    pub trend: TrendPolicy,
    /// `[sparkline]` section.
    pub sparkline: SparklineFrame,
}

impl EngineConfig {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is malformed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// The embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the embedded document is malformed.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml_str(DEFAULT_CONFIG_TOML)
    }

    /// Loads an override file, or the embedded defaults when `path` is
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Self::embedded();
        };
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }
}
