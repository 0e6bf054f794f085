//! Error types for Memorize

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemorizeError {
    #[error("Data not available: {0}")]
    DataNotAvailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<rusqlite::Error> for MemorizeError {
    fn from(e: rusqlite::Error) -> Self {
        MemorizeError::Database(e.to_string())
    }
}

/// Failure of a remote dictionary lookup.
///
/// Both variants degrade the same way in the presenter: the loading
/// indicator is cleared and nothing else is shown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        LookupError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(e: serde_json::Error) -> Self {
        LookupError::Decode(e.to_string())
    }
}
