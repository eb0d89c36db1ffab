use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::util::with_retry;
use crate::core::config::ExchangeRateProviderConfig;
use crate::core::currency::{BASE_CURRENCY, SUPPORTED_CURRENCIES, is_base};
use crate::core::error::RateError;
use crate::core::provider::RateProvider;
use crate::core::rates::{RateSource, RateTable};

pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Live rates from an exchangerate-api compatible `/v4/latest/{base}` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, timeout: Duration, retries: usize) -> Result<Self, RateError> {
        let client = reqwest::Client::builder()
            .user_agent("xrate/1.0")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retries,
        })
    }

    pub fn from_config(config: &ExchangeRateProviderConfig) -> Result<Self, RateError> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            config.retries,
        )
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: Option<String>,
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    fn name(&self) -> &str {
        "exchangerate-api"
    }

    #[instrument(name = "ExchangeRateFetch", skip(self))]
    async fn fetch(&self) -> Result<RateTable, RateError> {
        let url = format!("{}/v4/latest/{}", self.base_url, BASE_CURRENCY);
        debug!("Requesting exchange rates from {}", url);

        let response = with_retry(|| self.client.get(&url).send(), self.retries, RETRY_DELAY)
            .await
            .map_err(|e| RateError::SourceUnavailable(format!("Request error: {e} URL: {url}")))?;

        if !response.status().is_success() {
            return Err(RateError::SourceUnavailable(format!(
                "HTTP error: {} URL: {}",
                response.status(),
                url
            )));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text).map_err(|e| {
            RateError::SourceUnavailable(format!("Failed to parse rates response: {e}"))
        })?;

        if let Some(base) = &data.base {
            if !is_base(base) {
                return Err(RateError::SourceUnavailable(format!(
                    "Unexpected base currency: {base}"
                )));
            }
        }
        if data.rates.is_empty() {
            return Err(RateError::SourceUnavailable("No rates in response".to_string()));
        }

        let mut table = RateTable::new(RateSource::Live, data.rates);
        let patched = table.fill_missing(
            &self.fallback(),
            SUPPORTED_CURRENCIES.iter().map(|c| c.code),
        );
        if !patched.is_empty() {
            info!(?patched, "Filled currencies missing from live rates with fallback values");
        }

        debug!(rates = table.len(), "Parsed live exchange rates");
        Ok(table)
    }
}
