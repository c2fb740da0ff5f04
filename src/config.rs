//! Settings file support for the extraction tool.
//!
//! Settings are optional: every field has a default, and a settings file only
//! needs to name the values it changes. Command line flags override the file.

use std::path::Path;

use serde::Deserialize;

use crate::error::ExtractError;
use crate::extract::ExtractOptions;

/// Log level setting for the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    #[default]
    Warn,
    /// Show errors, warnings, and info messages
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Filter handed to the logger for this level.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current settings file format version.
/// Increment this when making breaking changes to the settings format.
pub const SETTINGS_VERSION: u32 = 1;

/// Tool settings that can be loaded from a JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Version of the settings file format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Shift FreeSurfer surface coordinates by the volume's cras offset
    #[serde(default = "default_true")]
    pub apply_cras: bool,

    /// Reject meshes whose faces reference vertices that do not exist
    #[serde(default = "default_true")]
    pub validate_faces: bool,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_true() -> bool {
    true
}

impl Settings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self {
            version: SETTINGS_VERSION,
            log_level: LogLevel::default(),
            apply_cras: true,
            validate_faces: true,
        }
    }

    /// Deserialize settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;

        if settings.version > SETTINGS_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: settings.version,
                supported_version: SETTINGS_VERSION,
            });
        }

        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Extraction options derived from these settings.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::new()
            .apply_cras(self.apply_cras)
            .validate_faces(self.validate_faces)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Settings version is newer than supported
    #[error(
        "Settings file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading settings
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ConfigError> for ExtractError {
    fn from(err: ConfigError) -> Self {
        ExtractError::config(err.to_string())
    }
}
