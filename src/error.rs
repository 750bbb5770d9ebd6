//! Error types for price_monitor

use thiserror::Error;

/// Unified error type for price_monitor operations
#[derive(Debug, Error)]
pub enum MonitorError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// Reading or writing the snapshot file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse or serialize JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The shop page did not contain the embedded product data
    #[error("Could not find product data on {url}")]
    MissingProductData { url: String },
    /// The embedded product data did not have the expected shape
    #[error("Invalid product data on {url}: {reason}")]
    InvalidProductData { url: String, reason: String },
    /// Telegram rejected the message
    #[error("Telegram API error ({status}): {description}")]
    Telegram {
        status: reqwest::StatusCode,
        description: String,
    },
}

/// Result alias for price_monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;
