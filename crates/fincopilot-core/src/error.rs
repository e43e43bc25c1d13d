//! Error types for fincopilot

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid window: {0} days (must be between 1 and 36500)")]
    InvalidWindow(i64),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
