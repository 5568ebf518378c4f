//! Error types for sk-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for sk-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for sk-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Pre-flight validation failure (label characters, storage class)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found: bucket, blob, or local folder
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local read/write failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any remote failure, propagated generically from the provider
    #[error("Provider error: {0}")]
    Provider(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Alias not found
    #[error("Alias not found: {0}")]
    AliasNotFound(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) | Error::InvalidPath(_) | Error::Config(_) => 2, // UsageError
            Error::Provider(_) => 3,                                              // ProviderError
            Error::NotFound(_) | Error::AliasNotFound(_) => 5,                    // NotFound
            _ => 1,                                                               // GeneralError
        }
    }
}
