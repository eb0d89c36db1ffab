//! Rate tables keyed by currency code, relative to the base currency

use crate::core::currency::{BASE_CURRENCY, is_base, normalize_code};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::warn;

/// Static rates used whenever the live source cannot be reached.
pub const FALLBACK_RATES: [(&str, f64); 31] = [
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("JPY", 148.50),
    ("CAD", 1.35),
    ("AUD", 1.52),
    ("CNY", 7.18),
    ("INR", 83.10),
    ("NPR", 133.25),
    ("SGD", 1.34),
    ("AED", 3.67),
    ("CHF", 0.88),
    ("HKD", 7.82),
    ("KRW", 1330.0),
    ("MXN", 17.25),
    ("BRL", 4.95),
    ("RUB", 92.50),
    ("ZAR", 18.75),
    ("TRY", 30.85),
    ("NZD", 1.63),
    ("SEK", 10.45),
    ("NOK", 10.85),
    ("DKK", 6.88),
    ("PLN", 4.02),
    ("THB", 35.60),
    ("IDR", 15650.0),
    ("MYR", 4.68),
    ("PHP", 56.20),
    ("SAR", 3.75),
    ("EGP", 30.90),
    ("PKR", 281.5),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Live,
    Fallback,
}

impl Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RateSource::Live => "live",
                RateSource::Fallback => "fallback",
            }
        )
    }
}

/// Currency code to rate per one unit of [`BASE_CURRENCY`].
///
/// The base currency is always present with a rate of exactly 1.0, and every
/// other rate is positive and finite. Tables are immutable once built; the
/// cache swaps whole tables rather than editing them in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    source: RateSource,
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Builds a table, normalising codes and discarding unusable rates.
    pub fn new<I, S>(source: RateSource, rates: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut table = BTreeMap::new();
        for (code, rate) in rates {
            let code = normalize_code(code.as_ref());
            if code == BASE_CURRENCY {
                continue;
            }
            if rate.is_finite() && rate > 0.0 {
                table.insert(code, rate);
            } else {
                warn!(%code, rate, "Discarding non-positive rate");
            }
        }
        table.insert(BASE_CURRENCY.to_string(), 1.0);

        Self {
            source,
            rates: table,
        }
    }

    pub fn fallback() -> Self {
        Self::new(RateSource::Fallback, FALLBACK_RATES)
    }

    pub fn source(&self) -> RateSource {
        self.source
    }

    /// Rate for `code`, with the base currency pinned to 1.0.
    pub fn rate(&self, code: &str) -> Option<f64> {
        if is_base(code) {
            return Some(1.0);
        }
        self.rates.get(&normalize_code(code)).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rate(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Iterates rates sorted by currency code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    /// Copies rates for any of `codes` absent here from `other`. Returns the
    /// codes that were filled in.
    pub fn fill_missing<'a>(
        &mut self,
        other: &RateTable,
        codes: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        let mut patched = Vec::new();
        for code in codes {
            if self.contains(code) {
                continue;
            }
            if let Some(rate) = other.rate(code) {
                let code = normalize_code(code);
                self.rates.insert(code.clone(), rate);
                patched.push(code);
            }
        }
        patched
    }
}
