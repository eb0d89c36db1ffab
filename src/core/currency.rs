//! Supported currencies and their display metadata

use serde::Serialize;

/// Pivot currency. Every rate is expressed per one unit of it.
pub const BASE_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

const fn info(code: &'static str, name: &'static str, symbol: &'static str) -> CurrencyInfo {
    CurrencyInfo { code, name, symbol }
}

pub const SUPPORTED_CURRENCIES: [CurrencyInfo; 31] = [
    info("USD", "US Dollar", "$"),
    info("EUR", "Euro", "€"),
    info("GBP", "British Pound", "£"),
    info("JPY", "Japanese Yen", "¥"),
    info("CAD", "Canadian Dollar", "CA$"),
    info("AUD", "Australian Dollar", "A$"),
    info("CNY", "Chinese Yuan", "¥"),
    info("INR", "Indian Rupee", "₹"),
    info("NPR", "Nepali Rupee", "रु"),
    info("SGD", "Singapore Dollar", "S$"),
    info("AED", "UAE Dirham", "د.إ"),
    info("CHF", "Swiss Franc", "CHF"),
    info("HKD", "Hong Kong Dollar", "HK$"),
    info("KRW", "South Korean Won", "₩"),
    info("MXN", "Mexican Peso", "MX$"),
    info("BRL", "Brazilian Real", "R$"),
    info("RUB", "Russian Ruble", "₽"),
    info("ZAR", "South African Rand", "R"),
    info("TRY", "Turkish Lira", "₺"),
    info("NZD", "New Zealand Dollar", "NZ$"),
    info("SEK", "Swedish Krona", "kr"),
    info("NOK", "Norwegian Krone", "kr"),
    info("DKK", "Danish Krone", "kr"),
    info("PLN", "Polish Zloty", "zł"),
    info("THB", "Thai Baht", "฿"),
    info("IDR", "Indonesian Rupiah", "Rp"),
    info("MYR", "Malaysian Ringgit", "RM"),
    info("PHP", "Philippine Peso", "₱"),
    info("SAR", "Saudi Riyal", "﷼"),
    info("EGP", "Egyptian Pound", "E£"),
    info("PKR", "Pakistani Rupee", "₨"),
];

/// Currencies shown in the quick-glance rates view, in display order.
pub const POPULAR_CURRENCIES: [&str; 11] = [
    "USD", "EUR", "GBP", "JPY", "CAD", "AUD", "CNY", "INR", "NPR", "SGD", "AED",
];

/// Canonical form of a currency code: trimmed and uppercased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub fn is_base(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case(BASE_CURRENCY)
}

pub fn lookup(code: &str) -> Option<&'static CurrencyInfo> {
    let code = normalize_code(code);
    SUPPORTED_CURRENCIES.iter().find(|c| c.code == code)
}
