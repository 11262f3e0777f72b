#![forbid(unsafe_code)]

//! Sequencer configuration.
//!
//! ```toml
//! # codetrail-history.toml
//! max_depth = 200
//! trace_dump = false
//! ```
//!
//! ```rust,ignore
//! let config = SequencerConfig::from_toml_file("codetrail-history.toml")?;
//! let config = SequencerConfig::from_json_str(r#"{"max_depth": 50}"#)?;
//! ```
//!
//! Loaders validate before returning. Missing keys take their defaults, and
//! `SequencerConfig::default()` keeps the full history.

#[cfg(feature = "sequencer-config")]
use std::path::Path;

#[cfg(feature = "sequencer-config")]
use serde::{Deserialize, Serialize};

/// Tunables for [`UndoRedoSequencer`](super::UndoRedoSequencer).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sequencer-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "sequencer-config", serde(default))]
pub struct SequencerConfig {
    /// Maximum number of logged commands (0 = unlimited).
    pub max_depth: usize,
    /// Emit the history dump at TRACE level after every change.
    pub trace_dump: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl SequencerConfig {
    /// Keep the whole history for the lifetime of the project.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            trace_dump: false,
        }
    }

    /// Set the history depth limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable the TRACE history dump.
    #[must_use]
    pub const fn with_trace_dump(mut self, trace_dump: bool) -> Self {
        self.trace_dump = trace_dump;
        self
    }

    /// Check parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        // One command can never be undone past; a depth of 1 disables history.
        if self.max_depth == 1 {
            errors.push("max_depth must be 0 (unlimited) or at least 2, got 1".into());
        }

        errors
    }

    /// Return `self` if valid, otherwise the validation errors.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "sequencer-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)?.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "sequencer-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "sequencer-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)?.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "sequencer-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}

/// Errors that can occur when loading a sequencer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "sequencer-config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "sequencer-config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
