//! Error types for file inspection operations.
//!
//! Most failures inside the engine are recovered locally and turned into
//! summary lines. These variants surface only from the few places that
//! cannot degrade: reading a file from disk, or finding no explorer at all.

use thiserror::Error;

use crate::formats::compression::CompressionCodec;

/// Result type alias using `ExploreError`.
pub type Result<T> = std::result::Result<T, ExploreError>;

/// Errors that can occur while inspecting a file.
#[derive(Error, Debug)]
pub enum ExploreError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No explorer recognizes the file.
    #[error("unsupported file format")]
    UnsupportedFormat,

    /// Container structure could not be read.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// A compressed stream could not be decoded.
    #[error("{codec} decompression failed: {source}")]
    Decompression {
        /// Codec that failed.
        codec: CompressionCodec,
        /// Underlying decoder error.
        source: std::io::Error,
    },

    /// An external analysis tool is not on the search path.
    #[error("tool not found: {0}")]
    ToolUnavailable(String),

    /// The temporary copy used for tool analysis could not be written.
    #[error("could not create temporary file: {0}")]
    TempFile(#[source] std::io::Error),

    /// The subprocess runtime could not be started.
    #[error("could not start subprocess runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl ExploreError {
    /// Returns `true` if the error only affects external tool analysis.
    #[must_use]
    pub const fn is_tool_error(&self) -> bool {
        matches!(
            self,
            Self::ToolUnavailable(_) | Self::TempFile(_) | Self::Runtime(_)
        )
    }
}
