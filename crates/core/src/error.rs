//! Error types for the vizseg segmentation library.

use thiserror::Error;

/// Primary error type for segmentation operations.
#[derive(Error, Debug)]
pub enum SegmError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    #[error("area node {0} is not attached to the tree")]
    DetachedNode(usize),

    #[error("invalid color: {0}")]
    Color(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for SegmError.
pub type Result<T> = std::result::Result<T, SegmError>;
