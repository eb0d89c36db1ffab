use crate::core::error::RateError;
use crate::core::provider::RateProvider;
use crate::core::rates::RateTable;
use async_trait::async_trait;
use tracing::debug;

/// Offline provider serving the static fallback rates as if they were live.
///
/// Used when no live source is configured, so the demo rates are cached like
/// any other successful fetch instead of being retried on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackRateProvider;

#[async_trait]
impl RateProvider for FallbackRateProvider {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn fetch(&self) -> Result<RateTable, RateError> {
        debug!("Using built-in exchange rates");
        Ok(self.fallback())
    }
}
