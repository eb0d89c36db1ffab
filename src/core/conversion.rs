//! Currency conversion through the base currency

use crate::core::currency::{BASE_CURRENCY, normalize_code};
use crate::core::error::ConversionError;
use crate::core::rates::RateTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const RESULT_DECIMALS: i32 = 4;
const RATE_DECIMALS: i32 = 6;
// 2^52: from here on every f64 is an integer.
const MAX_EXACT_INTEGER: f64 = 4_503_599_627_370_496.0;

fn default_from() -> String {
    BASE_CURRENCY.to_string()
}

fn default_to() -> String {
    "EUR".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversionRequest {
    #[serde(default)]
    pub amount: f64,
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_to")]
    pub to: String,
}

impl ConversionRequest {
    pub fn new(amount: f64, from: &str, to: &str) -> Self {
        Self {
            amount,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn convert(&self, table: &RateTable) -> Result<ConversionResult, ConversionError> {
        convert(table, self.amount, &self.from, &self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub result: f64,
    /// Units of `to` per unit of `from`.
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
}

/// Client-facing payload for a conversion attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResponse {
    pub success: bool,
    #[serde(flatten)]
    pub conversion: Option<ConversionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<ConversionResult, ConversionError>> for ConversionResponse {
    fn from(outcome: Result<ConversionResult, ConversionError>) -> Self {
        match outcome {
            Ok(conversion) => Self {
                success: true,
                conversion: Some(conversion),
                error: None,
            },
            Err(e) => Self {
                success: false,
                conversion: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Rounds to `decimals` places, exact ties going to the even digit.
///
/// Values too large to carry a fraction at that scale are returned as is.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= MAX_EXACT_INTEGER {
        return value;
    }
    scaled.round_ties_even() / factor
}

fn rate_for(table: &RateTable, code: &str) -> Result<f64, ConversionError> {
    table
        .rate(code)
        .ok_or_else(|| ConversionError::UnsupportedCurrency(code.to_string()))
}

/// Converts `amount` of `from` into `to`, pivoting through the base currency.
///
/// Currency support is judged against `table`, so a code present only in a
/// live table is rejected while the fallback table is active.
pub fn convert(
    table: &RateTable,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<ConversionResult, ConversionError> {
    if !(amount.is_finite() && amount > 0.0) {
        return Err(ConversionError::InvalidAmount(amount));
    }

    let from = normalize_code(from);
    let to = normalize_code(to);
    let from_rate = rate_for(table, &from)?;
    let to_rate = rate_for(table, &to)?;

    let amount_in_base = amount / from_rate;
    let result = amount_in_base * to_rate;
    let rate = to_rate / from_rate;

    Ok(ConversionResult {
        amount,
        from,
        to,
        result: round_to(result, RESULT_DECIMALS),
        rate: round_to(rate, RATE_DECIMALS),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::SUPPORTED_CURRENCIES;
    use crate::core::rates::RateSource;

    fn sample_table() -> RateTable {
        RateTable::new(
            RateSource::Live,
            [("USD", 1.0), ("EUR", 0.92), ("NPR", 133.25)],
        )
    }

    #[test]
    fn test_usd_to_npr() {
        let result = convert(&sample_table(), 100.0, "USD", "NPR").unwrap();
        assert_eq!(result.result, 13325.0);
        assert_eq!(result.rate, 133.25);
        assert_eq!(result.from, "USD");
        assert_eq!(result.to, "NPR");
        assert_eq!(result.amount, 100.0);
    }

    #[test]
    fn test_npr_to_usd() {
        let result = convert(&sample_table(), 1000.0, "NPR", "USD").unwrap();
        assert_eq!(result.result, 7.5047);
        assert_eq!(result.rate, 0.007505);
        assert!((result.rate - 0.0075).abs() < 1e-5);
    }

    #[test]
    fn test_cross_rate_between_non_base_currencies() {
        let result = convert(&sample_table(), 50.0, "EUR", "NPR").unwrap();
        let expected = 50.0 / 0.92 * 133.25;
        assert!((result.result - expected).abs() < 1e-4);
        assert_eq!(result.rate, round_to(133.25 / 0.92, 6));
    }

    #[test]
    fn test_same_currency_is_identity() {
        let table = RateTable::fallback();
        for currency in SUPPORTED_CURRENCIES {
            let result = convert(&table, 42.5, currency.code, currency.code).unwrap();
            assert_eq!(result.result, 42.5, "{}", currency.code);
            assert_eq!(result.rate, 1.0, "{}", currency.code);
        }
    }

    #[test]
    fn test_round_trip_returns_original_amount() {
        let table = RateTable::fallback();
        for (from, to) in [("USD", "JPY"), ("GBP", "INR"), ("IDR", "EUR"), ("NPR", "KRW")] {
            let there = convert(&table, 1234.5, from, to).unwrap();
            let back = convert(&table, there.result, to, from).unwrap();
            let tolerance = 1e-4 * (1.0 + table.rate(from).unwrap() / table.rate(to).unwrap());
            assert!(
                (back.result - 1234.5).abs() <= tolerance,
                "{from}->{to}->{from} gave {}",
                back.result
            );
        }
    }

    #[test]
    fn test_result_matches_rate_composition() {
        let table = RateTable::fallback();
        for from in SUPPORTED_CURRENCIES {
            for to in SUPPORTED_CURRENCIES {
                let from_rate = table.rate(from.code).unwrap();
                let to_rate = table.rate(to.code).unwrap();
                let result = convert(&table, 250.0, from.code, to.code).unwrap();
                assert!((result.result - 250.0 * to_rate / from_rate).abs() <= 1e-4);
                assert!((result.rate - to_rate / from_rate).abs() <= 1e-6);
            }
        }
    }

    #[test]
    fn test_exact_ties_round_to_even() {
        let table = sample_table();
        assert_eq!(convert(&table, 0.03125, "USD", "USD").unwrap().result, 0.0312);
        assert_eq!(convert(&table, 0.09375, "USD", "USD").unwrap().result, 0.0938);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-0.03125, 4), -0.0312);
    }

    #[test]
    fn test_huge_amounts_do_not_overflow_rounding() {
        let result = convert(&sample_table(), f64::MAX, "USD", "USD").unwrap();
        assert_eq!(result.result, f64::MAX);
        assert_eq!(result.rate, 1.0);

        let result = convert(&sample_table(), 1e300, "EUR", "USD").unwrap();
        assert!(result.result.is_finite());
        assert!((result.result / (1e300 / 0.92) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_amounts() {
        let table = sample_table();
        for amount in [-5.0, 0.0, f64::NAN, f64::INFINITY] {
            let err = convert(&table, amount, "USD", "EUR").unwrap_err();
            assert!(matches!(err, ConversionError::InvalidAmount(_)));
            assert_eq!(err.to_string(), "Amount must be positive");
        }
    }

    #[test]
    fn test_unsupported_currency() {
        let table = sample_table();
        let err = convert(&table, 100.0, "USD", "ZZZ").unwrap_err();
        assert_eq!(err, ConversionError::UnsupportedCurrency("ZZZ".to_string()));
        assert_eq!(err.to_string(), "Unsupported currency: ZZZ");

        let err = convert(&table, 100.0, "GBP", "ZZZ").unwrap_err();
        assert_eq!(err, ConversionError::UnsupportedCurrency("GBP".to_string()));
    }

    #[test]
    fn test_codes_are_case_insensitive() {
        let result = convert(&sample_table(), 10.0, "usd", "eur").unwrap();
        assert_eq!(result.from, "USD");
        assert_eq!(result.to, "EUR");
        assert_eq!(result.result, 9.2);
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: ConversionRequest = serde_json::from_str(r#"{"amount": 10}"#).unwrap();
        assert_eq!(request, ConversionRequest::new(10.0, "USD", "EUR"));

        let request: ConversionRequest = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            request.convert(&sample_table()),
            Err(ConversionError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_response_payloads() {
        let ok: ConversionResponse = convert(&sample_table(), 100.0, "USD", "NPR").into();
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["result"], 13325.0);
        assert_eq!(json["rate"], 133.25);
        assert_eq!(json["from"], "USD");
        assert!(json["timestamp"].is_string());
        assert!(json.get("error").is_none());

        let failed: ConversionResponse = convert(&sample_table(), 100.0, "USD", "ZZZ").into();
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Unsupported currency: ZZZ"})
        );
    }
}
