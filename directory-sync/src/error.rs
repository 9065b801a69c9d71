//! Unified error types for the directory sync job.
//!
//! Every variant here is fatal to a run. Per-network validation problems are
//! not errors; they surface as [`SkipReason`](crate::pipeline::SkipReason).

use thiserror::Error;

/// Top-level error type for the directory sync job.
#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration is missing or malformed.
    #[error("config: {0}")]
    Config(String),

    /// Directory enumeration or descriptor fetch failed.
    #[error("directory: {0}")]
    Directory(String),

    /// The result envelope could not be serialized.
    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Local file output failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Blob store upload failed.
    #[error("upload: {0}")]
    Upload(String),

    /// Edge-cache invalidation failed.
    #[error("invalidate: {0}")]
    Invalidate(String),
}

impl Error {
    /// Builds a [`Error::Config`] from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Builds a [`Error::Directory`] carrying the failing request context.
    pub fn directory(context: impl std::fmt::Display, source: impl std::fmt::Display) -> Self {
        Self::Directory(format!("{context}: {source}"))
    }
}
