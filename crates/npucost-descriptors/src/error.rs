//! Descriptor encoding errors.

use thiserror::Error;

/// Errors raised while building an encoder or encoding a workload.
///
/// None of these is recoverable inside one encode call: a descriptor that cannot be
/// produced exactly must not be produced at all.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A write landed at or past the end of the descriptor buffer.
    #[error("descriptor write at offset {offset} exceeds capacity {capacity}")]
    OutOfRange { offset: usize, capacity: usize },

    /// A present-day value has no counterpart in the target interface.
    #[error("cannot convert '{value}' to {target}, this value might not be supported; known values: {candidates}")]
    EnumTranslation {
        value: String,
        target: &'static str,
        /// The whole index to text map of the target enumeration.
        candidates: String,
    },

    /// The target interface explicitly declares a present-day value as not supported.
    #[error("'{value}' has no logical mapping in {target}")]
    LogicalRemap { value: String, target: &'static str },

    /// An encoder wrote a different number of values than it declares.
    #[error("interface {version} declares {declared} values but wrote {written}")]
    SizeMismatch {
        version: u32,
        declared: usize,
        written: usize,
    },

    /// No encoder is registered for a version id.
    #[error("no descriptor encoder for interface version {version}, known versions: {known:?}")]
    UnknownVersion { version: u32, known: Vec<u32> },
}

/// Result type for descriptor operations.
pub type Result<T> = std::result::Result<T, EncodeError>;
