//! Error types for trace loading and configuration
//!
//! The analysis core never fails: every error originates at the boundary,
//! where raw trace lines or config files are turned into validated values.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a trace or its configuration
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Failed to open trace {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON at line {line}: {source}")]
    InvalidJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record at line {line} has no \"type\" field")]
    MissingType { line: usize },

    #[error("Malformed instances record at line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TraceError {
    /// Line number (1-based) the error refers to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Read { line, .. }
            | Self::InvalidJson { line, .. }
            | Self::MissingType { line }
            | Self::MalformedRecord { line, .. } => Some(*line),
            Self::Open { .. } | Self::InvalidConfig(_) => None,
        }
    }
}

/// Result type for trace loading operations
pub type Result<T> = std::result::Result<T, TraceError>;
