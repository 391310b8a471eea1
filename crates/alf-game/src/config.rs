//! Simulation configuration and data-file loading.
//!
//! A [`SimConfig`] can be written in RON, TOML or JSON; the format is chosen
//! from the file extension. Missing fields take their defaults.

use crate::state::StateSnapshot;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("{format:?} parse error: {detail}")]
    Parse { format: Format, detail: String },

    /// A field holds a value the simulation cannot run with.
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(ConfigError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// SimConfig
// ===========================================================================

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seconds per logic step.
    pub fixed_delta_time: f32,
    /// Drained commands kept in the queue history. 0 disables history.
    pub command_history: usize,
    /// Values the state starts from.
    pub initial: StateSnapshot,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_delta_time: 0.02,
            command_history: 0,
            initial: StateSnapshot::default(),
        }
    }
}

impl SimConfig {
    pub fn with_fixed_delta_time(fixed_delta_time: f32) -> Self {
        Self {
            fixed_delta_time,
            ..Self::default()
        }
    }

    /// Reject values the simulation cannot start from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fixed_delta_time.is_finite() || self.fixed_delta_time <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "fixed_delta_time",
                reason: format!("must be positive and finite, got {}", self.fixed_delta_time),
            });
        }
        let health = self.initial.health;
        if !health.is_finite() || health < 0.0 {
            return Err(ConfigError::Invalid {
                field: "initial.health",
                reason: format!("must be non-negative and finite, got {health}"),
            });
        }
        Ok(())
    }

    /// Parse a configuration from text in the given format, then validate it.
    pub fn parse(content: &str, format: Format) -> Result<Self, ConfigError> {
        let parse_err = |detail: String| ConfigError::Parse { format, detail };
        let config: SimConfig = match format {
            Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string()))?,
            Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string()))?,
            Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string()))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
