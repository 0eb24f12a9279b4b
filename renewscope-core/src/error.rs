//! Error types for renewscope-core

use thiserror::Error;

/// Main error type for the renewscope-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input could not be read as tabular data at all
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for renewscope-core
pub type Result<T> = std::result::Result<T, Error>;
