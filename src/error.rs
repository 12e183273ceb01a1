//! Error types for playlist concatenation

use std::path::PathBuf;
use thiserror::Error;

/// Problems reading or interpreting the app config document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a JSON object at the root of {0:?}")]
    NotAnObject(PathBuf),

    #[error("no tracks found in app config")]
    NoTracks,

    #[error("invalid track at index {index}: {reason}")]
    InvalidTrack { index: usize, reason: String },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything that can end a concatenation run
#[derive(Debug, Error)]
pub enum ConcatError {
    /// Planning resolved zero tracks; no artifact is attempted
    #[error("no valid tracks to concatenate")]
    NoValidTracks,

    #[error("{what} not found: {path:?}")]
    MissingPath { what: &'static str, path: PathBuf },

    #[error("transcode tool unavailable: {0}")]
    ToolUnavailable(String),

    /// Recoverable: the orchestrator escalates to the per-file path
    #[error("bulk concatenation failed with exit code {exit_code}")]
    BulkExecution { exit_code: i32, tail: String },

    #[error("fallback concatenation failed with exit code {exit_code}")]
    FallbackExecution { exit_code: i32, tail: String },

    #[error("normalizing track {track_id} failed with exit code {exit_code}")]
    PerFileNormalize {
        track_id: String,
        exit_code: i32,
        tail: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConcatError {
    /// Bounded tool diagnostics attached to this failure, if any
    pub fn diagnostic_tail(&self) -> Option<&str> {
        match self {
            ConcatError::BulkExecution { tail, .. }
            | ConcatError::FallbackExecution { tail, .. }
            | ConcatError::PerFileNormalize { tail, .. } => Some(tail.as_str()),
            _ => None,
        }
    }
}
