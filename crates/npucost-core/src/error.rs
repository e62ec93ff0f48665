//! Error types for the data model.

/// Errors raised while building or converting workloads.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A workload cannot be expressed in a narrower workload model.
    #[error("cannot create {target}: {reason}")]
    Unrepresentable {
        /// Name of the workload type that was requested.
        target: &'static str,
        /// Why the source workload does not fit.
        reason: String,
    },

    /// A text key did not name any value of an enumeration.
    #[error("unknown {enumeration} text: '{text}'")]
    UnknownText {
        /// Enumeration being parsed.
        enumeration: &'static str,
        /// The offending text.
        text: String,
    },
}

/// Result type for data model operations.
pub type Result<T> = std::result::Result<T, CoreError>;
