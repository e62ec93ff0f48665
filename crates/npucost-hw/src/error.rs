//! Error types for hardware characteristics and configuration.

use std::path::PathBuf;

/// Errors that can occur while loading or saving a cost model configuration.
#[derive(Debug, thiserror::Error)]
pub enum HwError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file not found.
    #[error("configuration file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },
}

/// Result type for hardware characteristics operations.
pub type Result<T> = std::result::Result<T, HwError>;
