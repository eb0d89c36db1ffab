//! Core rate caching and conversion logic

pub mod cache;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod log;
pub mod provider;
pub mod rates;
pub mod service;

// Re-export main types for cleaner imports
pub use cache::RateCache;
pub use conversion::{ConversionRequest, ConversionResponse, ConversionResult, convert};
pub use error::{ConversionError, RateError};
pub use provider::RateProvider;
pub use rates::{RateSource, RateTable};
pub use service::ConverterService;
