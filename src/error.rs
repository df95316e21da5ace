use thiserror::Error as ThisError;

/// Errors that can occur in the logging library
#[derive(ThisError, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
    /// The logger is already running; `stop` must be called before starting again.
    #[error("logger already started")]
    AlreadyStarted,
    #[error("Time error: {0}")]
    Time(#[from] time::error::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
