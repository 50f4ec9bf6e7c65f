//! Error types for artifact loading and backend inference.
//!
//! None of these escape [`crate::estimate_crack_time`]: artifact errors
//! downgrade the engine to the next backend, inference errors fall through
//! to the entropy heuristic.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a backend artifact at startup.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed artifact: {0}")]
    Format(#[from] serde_json::Error),
    #[error("Invalid artifact: {0}")]
    Invalid(String),
    #[error("Incomplete artifact pair, missing {missing}")]
    IncompletePair { missing: PathBuf },
}

/// Failure raised by a loaded backend while answering a query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Inference failed: {0}")]
    Inference(String),
    #[error("Unknown strength label: {0:?}")]
    UnknownLabel(String),
    #[error("Unexpected output width {width}, expected 1 or 3")]
    UnexpectedOutput { width: usize },
    #[error("Backend returned no prediction")]
    EmptyOutput,
}

/// Failure to load a denylist file.
#[derive(Error, Debug)]
pub enum DenylistError {
    #[error("Denylist file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read denylist file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Denylist file is empty")]
    EmptyFile,
}
