//! Conversion service owning the shared rate cache

use crate::core::cache::RateCache;
use crate::core::conversion::{ConversionRequest, ConversionResult};
use crate::core::currency::{POPULAR_CURRENCIES, is_base};
use crate::core::error::ConversionError;
use crate::core::rates::{RateSource, RateTable};
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct PopularRates {
    pub source: RateSource,
    pub rates: Vec<(&'static str, f64)>,
}

/// Entry point for callers: every operation reads through the cache.
#[derive(Clone)]
pub struct ConverterService {
    cache: Arc<RateCache>,
}

impl ConverterService {
    pub fn new(cache: Arc<RateCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    #[instrument(
        name = "Convert",
        skip(self, request),
        fields(amount = request.amount, from = %request.from, to = %request.to)
    )]
    pub async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        let table = self.cache.get().await;
        let result = request.convert(&table);
        debug!(?result, source = %table.source(), "Conversion done");
        result
    }

    pub async fn latest_rates(&self) -> Arc<RateTable> {
        self.cache.get().await
    }

    /// Rates of the popular currencies against the base, base excluded.
    pub async fn popular_rates(&self) -> PopularRates {
        let table = self.cache.get().await;
        let rates = POPULAR_CURRENCIES
            .iter()
            .filter(|code| !is_base(code))
            .filter_map(|code| table.rate(code).map(|rate| (*code, rate)))
            .collect();
        PopularRates {
            source: table.source(),
            rates,
        }
    }
}
