//! Unified error handling for the packet-forwarder supervisor
//!
//! This crate provides the single error type used across all supervisor
//! components. It uses thiserror for ergonomic error definitions with proper
//! Display and Error trait impls.

use std::io;
use std::path::PathBuf;

/// Result type alias using PktfwdError
pub type Result<T> = std::result::Result<T, PktfwdError>;

/// Unified error type for all supervisor operations
#[derive(thiserror::Error, Debug)]
pub enum PktfwdError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: io::Error,
    },

    // ============================================================================
    // Configuration Errors (fatal, never retried)
    // ============================================================================
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to parse JSON template {path}: {source}")]
    TemplateParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Malformed template {path}: {reason}")]
    MalformedTemplate {
        path: PathBuf,
        reason: String,
    },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    // ============================================================================
    // Subprocess and Supervision Errors
    // ============================================================================
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: PathBuf,
        source: io::Error,
    },

    #[error("{what} failed after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        what: String,
        attempts: u32,
        source: Box<PktfwdError>,
    },
}

impl PktfwdError {
    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a file read error with path context
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a file write error with path context
    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// True for errors that indicate a deployment defect rather than a
    /// transient hardware condition. These abort startup without retrying.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownRegion(_)
                | Self::TemplateParse { .. }
                | Self::MalformedTemplate { .. }
                | Self::MissingConfig(_)
                | Self::InvalidConfig { .. }
        )
    }
}
