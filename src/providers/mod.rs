pub mod exchangerate_api;
pub mod fallback;
pub mod util;

use crate::core::config::ProvidersConfig;
use crate::core::provider::RateProvider;
use anyhow::{Context, Result};
use exchangerate_api::ExchangeRateApiProvider;
use fallback::FallbackRateProvider;
use std::sync::Arc;
use tracing::info;

/// Picks the live provider from config, or the offline one when it is absent
/// or `offline` is set.
pub fn from_config(config: &ProvidersConfig, offline: bool) -> Result<Arc<dyn RateProvider>> {
    match &config.exchangerate {
        Some(provider_config) if !offline => {
            let provider = ExchangeRateApiProvider::from_config(provider_config)
                .context("Failed to create exchange rate client")?;
            Ok(Arc::new(provider))
        }
        _ => {
            info!("Using demo exchange rates, no live rate source configured");
            Ok(Arc::new(FallbackRateProvider))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ExchangeRateProviderConfig;

    #[test]
    fn test_provider_selection() {
        let config = ProvidersConfig {
            exchangerate: Some(ExchangeRateProviderConfig::default()),
        };
        assert_eq!(from_config(&config, false).unwrap().name(), "exchangerate-api");
        assert_eq!(from_config(&config, true).unwrap().name(), "fallback");

        let config = ProvidersConfig { exchangerate: None };
        assert_eq!(from_config(&config, false).unwrap().name(), "fallback");
    }
}
