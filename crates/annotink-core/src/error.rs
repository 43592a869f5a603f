//! Error types for the canvas engine.

use thiserror::Error;

/// Errors raised by canvas configuration and history operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CanvasError {
    #[error("Unsupported shape kind: {0}")]
    UnsupportedShapeKind(String),
    #[error("Unexpected value for double_click event: {0}")]
    UnsupportedDoubleClick(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("No history to restore")]
    NoHistory,
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CanvasError {
    fn from(err: serde_json::Error) -> Self {
        CanvasError::Serialization(err.to_string())
    }
}

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;
