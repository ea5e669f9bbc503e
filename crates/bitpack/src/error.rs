//! Codec error type.

use bitpack_buffers::BufferError;

/// Broad category of a [`PackError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Range,
    Type,
    Configuration,
    Buffer,
}

/// Error raised by size computation, encoding, decoding or schema parsing.
///
/// All errors are raised synchronously. Encoding never produces a partially
/// written buffer: every value check happens during the size pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    /// Value outside a field's declared width, a length mismatch, or an
    /// out-of-range decoded union tag.
    #[error("range error: {0}")]
    Range(String),
    /// Value has the wrong shape for its schema node.
    #[error("type error: {0}")]
    Type(String),
    /// Schema cannot be used as declared.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Decoding ran past the end of the supplied buffer.
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

impl PackError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PackError::Range(_) => ErrorKind::Range,
            PackError::Type(_) => ErrorKind::Type,
            PackError::Configuration(_) => ErrorKind::Configuration,
            PackError::Buffer(_) => ErrorKind::Buffer,
        }
    }

    pub(crate) fn range(msg: impl Into<String>) -> Self {
        PackError::Range(msg.into())
    }

    pub(crate) fn type_(msg: impl Into<String>) -> Self {
        PackError::Type(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        PackError::Configuration(msg.into())
    }
}
