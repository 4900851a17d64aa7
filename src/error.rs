//! Error types for the head motion engine.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration value rejected at load time
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),

    /// The engine is already owned by another host
    #[error("Engine already in use")]
    EngineBusy,

    /// An event sink failed to deliver an event
    #[error("Listener error: {0}")]
    ListenerError(String),

    /// Recorded motion trace could not be read or parsed
    #[error("Trace error: {0}")]
    TraceError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
