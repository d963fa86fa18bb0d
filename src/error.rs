//! Error types for scene setup and settings loading

use thiserror::Error;

use crate::sim::NodeId;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("failed to parse settings: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("node {0} is not in the scene")]
    UnknownNode(NodeId),

    #[error("node {0} is not a block")]
    NotABlock(NodeId),
}

pub type Result<T> = std::result::Result<T, SceneError>;
