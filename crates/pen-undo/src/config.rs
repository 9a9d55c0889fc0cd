#![forbid(unsafe_code)]

//! History configuration.
//!
//! ```toml
//! # pen-undo.toml
//! max_commands = 100
//! ```
//!
//! ```rust,ignore
//! let config = UndoConfig::from_toml_file("pen-undo.toml")?;
//! let undo = UndoManager::<MyAction>::new(config);
//! ```

use std::fmt;
#[cfg(feature = "config-files")]
use std::path::Path;

#[cfg(feature = "config-files")]
use serde::{Deserialize, Serialize};

/// Default history size, enough for a long editing session.
pub const DEFAULT_MAX_COMMANDS: usize = 100;

/// Limits for the undo history.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct UndoConfig {
    /// Maximum number of commands kept for undo. When exceeded the oldest
    /// command is dropped and can no longer be undone.
    pub max_commands: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            max_commands: DEFAULT_MAX_COMMANDS,
        }
    }
}

impl UndoConfig {
    /// Configuration keeping at most `max_commands` undo entries.
    #[must_use]
    pub fn new(max_commands: usize) -> Self {
        Self { max_commands }
    }

    /// No eviction (for testing).
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_commands: usize::MAX,
        }
    }

    /// Check parameters; an empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.max_commands == 0 {
            errors.push("max_commands must be > 0".into());
        }
        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    #[cfg(feature = "config-files")]
    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading an [`UndoConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-files")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-files")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
