use chrono::{DateTime, Utc};

use crate::config::{Config, RiskPolicy};
use crate::core::lot_calculator::TradeSizingInput;
use crate::models::{CurrencyPairMeta, Locale};

/// USD/JPY, standard lot, 2-decimal pips.
pub fn usd_jpy() -> CurrencyPairMeta {
    CurrencyPairMeta::new("USD/JPY", 100_000.0, 2, "JPY").unwrap()
}

/// XAU/USD, 100 oz per lot.
pub fn xau_usd() -> CurrencyPairMeta {
    CurrencyPairMeta::new("XAU/USD", 100.0, 2, "USD").unwrap()
}

/// EUR/USD with a 10,000-unit contract, matching the legacy fixture data.
pub fn eur_usd_mini() -> CurrencyPairMeta {
    CurrencyPairMeta::new("EUR/USD", 10_000.0, 5, "USD").unwrap()
}

/// GBP/NZD with a 10,000-unit contract, matching the legacy fixture data.
pub fn gbp_nzd_mini() -> CurrencyPairMeta {
    CurrencyPairMeta::new("GBP/NZD", 10_000.0, 5, "NZD").unwrap()
}

/// 1,000,000 JPY account on USD/JPY, 30 pip stop, default risk.
pub fn usd_jpy_input() -> TradeSizingInput {
    TradeSizingInput::new(usd_jpy(), 1_000_000.0, 30.0, 1.0)
}

pub fn fixed_time(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

/// A Config suitable for testing: offline rates, temp journal file.
pub fn default_test_config() -> Config {
    Config {
        policy: RiskPolicy::default(),
        member_risk_limit: None,
        rate_api_url: "http://127.0.0.1:9/v6/latest".to_string(),
        rate_fallback: 100.0,
        rate_cache_secs: 300,
        offline: true,
        journal_file: std::env::temp_dir()
            .join("fx_journal_test.json")
            .to_string_lossy()
            .to_string(),
        locale: Locale::Ja,
        log_level: "ERROR".to_string(),
    }
}
