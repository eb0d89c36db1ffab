//! Error types for rate retrieval and conversion.

use thiserror::Error;

/// Failure to obtain a live rate table. Always recovered by the cache.
#[derive(Debug, Error)]
pub enum RateError {
    #[error("Rate source unavailable: {0}")]
    SourceUnavailable(String),
}

impl From<reqwest::Error> for RateError {
    fn from(e: reqwest::Error) -> Self {
        RateError::SourceUnavailable(e.to_string())
    }
}

/// Caller input errors raised by the conversion engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Amount must be positive")]
    InvalidAmount(f64),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
}
