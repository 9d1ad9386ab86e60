//! Error types.
//!
//! Every error is a programmer mistake surfaced synchronously to whoever
//! triggered it. Nothing here is retried.

use thiserror::Error;

use crate::engine::NodeId;

/// Errors produced by the node tree, dispatcher, and layout engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid layout template, descriptor array, or grid cell reference.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The handle refers to a node that was destroyed.
    #[error("use after free: node {0} was destroyed")]
    UseAfterFree(NodeId),

    /// A payload or style value had the wrong shape.
    #[error("programming error: {0}")]
    Programming(String),

    /// The layout solver rejected the tree.
    #[error("layout solver error: {0}")]
    Layout(String),

    /// Engine configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    /// Engine configuration file could not be read.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn programming(msg: impl Into<String>) -> Self {
        Self::Programming(msg.into())
    }
}
