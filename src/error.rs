// src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenerError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed stock data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid record at index {index} ({ticker:?}): {source}")]
    Validation {
        index: usize,
        ticker: String,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("Duplicate ticker {ticker:?} at indices {first} and {second}")]
    DuplicateTicker {
        ticker: String,
        first: usize,
        second: usize,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("Unknown sort direction: {0}")]
    UnknownSortDirection(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;
