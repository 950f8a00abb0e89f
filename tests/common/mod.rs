#![allow(dead_code)]

use fx_journal::core::TradeSizingInput;
use fx_journal::models::CurrencyPairMeta;

pub const BALANCE: f64 = 1_000_000.0;

/// Build pair metadata from (symbol, contract size, pip decimal position, quote).
pub fn pair(symbol: &str, contract_size: f64, pip_decimal_position: u32, quote: &str) -> CurrencyPairMeta {
    CurrencyPairMeta::new(symbol, contract_size, pip_decimal_position, quote).unwrap()
}

pub fn usd_jpy() -> CurrencyPairMeta {
    pair("USD/JPY", 100_000.0, 2, "JPY")
}

pub fn xau_usd() -> CurrencyPairMeta {
    pair("XAU/USD", 100.0, 2, "USD")
}

pub fn eur_usd_mini() -> CurrencyPairMeta {
    pair("EUR/USD", 10_000.0, 5, "USD")
}

pub fn gbp_nzd_mini() -> CurrencyPairMeta {
    pair("GBP/NZD", 10_000.0, 5, "NZD")
}

/// 1,000,000 JPY account risking 2%.
pub fn input(pair: CurrencyPairMeta, stop_loss_pips: f64, jpy_rate: f64) -> TradeSizingInput {
    TradeSizingInput::new(pair, BALANCE, stop_loss_pips, jpy_rate).with_risk_percent(2.0)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
