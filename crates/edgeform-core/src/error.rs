//! Error types.

use crate::scene::NodeId;
use thiserror::Error;

/// Reasons an overlay operation is skipped.
///
/// These never escape the public [`FrameManager`](crate::FrameManager) API:
/// the façade logs them and degrades to a no-op for that frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlayError {
    #[error("Node not found in scene: {0}")]
    NodeMissing(NodeId),
    #[error("Node {0} is not inside a layer")]
    NoLayer(NodeId),
    #[error("Pointer is outside the render surface")]
    NoPointer,
    #[error("Degenerate geometry: {0}")]
    Degenerate(&'static str),
}

/// Result type for overlay geometry operations.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}
