use std::path::PathBuf;

use thiserror::Error;

/// Error types for IMU log decoding and export
#[derive(Debug, Error)]
pub enum ImuLogError {
    /// Source file missing or unreadable
    #[error("Failed to read input {path:?}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A partial block at the end of the buffer
    #[error(
        "Truncated block at offset {offset}: {remaining} bytes left, block size is {block_size}"
    )]
    TruncatedBlock {
        offset: usize,
        remaining: usize,
        block_size: usize,
    },

    /// Read past the end of the buffer
    #[error("Unexpected end of data at offset {offset}: needed {needed} bytes")]
    UnexpectedEof { offset: usize, needed: usize },

    /// Format descriptor that cannot describe a real log
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Destination not writable
    #[error("Failed to write output {path:?}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding errors
    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ImuLogError {
    pub fn invalid_format<S: Into<String>>(msg: S) -> Self {
        Self::InvalidFormat(msg.into())
    }

    pub(crate) fn output_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImuLogError>;
