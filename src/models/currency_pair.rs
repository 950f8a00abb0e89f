use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

use crate::models::Locale;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PairError {
    #[error("pair symbol is empty")]
    EmptySymbol,
    #[error("{symbol}: contract size must be positive, got {value}")]
    ContractSize { symbol: String, value: f64 },
    #[error("{symbol}: unsupported pip decimal position {value}")]
    PipDecimalPosition { symbol: String, value: u32 },
    #[error("{symbol}: quote currency is empty")]
    EmptyQuote { symbol: String },
}

/// Pip resolution class of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipSizeClass {
    /// 2 or 3 decimal quotes: JPY-quoted pairs and gold. 1 pip = 0.01.
    TwoDecimal,
    /// 4 or 5 decimal quotes: everything else. 1 pip = 0.0001.
    FourOrFiveDecimal,
}

impl PipSizeClass {
    pub fn from_decimal_position(position: u32) -> Option<PipSizeClass> {
        match position {
            2 | 3 => Some(PipSizeClass::TwoDecimal),
            4 | 5 => Some(PipSizeClass::FourOrFiveDecimal),
            _ => None,
        }
    }

    pub fn pip_size(&self) -> f64 {
        match self {
            PipSizeClass::TwoDecimal => 0.01,
            PipSizeClass::FourOrFiveDecimal => 0.0001,
        }
    }
}

impl fmt::Display for PipSizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipSizeClass::TwoDecimal => write!(f, "two_decimal"),
            PipSizeClass::FourOrFiveDecimal => write!(f, "four_or_five_decimal"),
        }
    }
}

/// Wire shape of a pair row as the metadata provider delivers it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PairRow {
    symbol: String,
    contract_size: f64,
    pip_decimal_position: u32,
    quote_currency: String,
}

/// Static metadata of a tradable pair. Validated on construction, so every
/// instance has a positive contract size and a known pip class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PairRow", into = "PairRow")]
pub struct CurrencyPairMeta {
    symbol: String,
    contract_size: f64,
    pip_decimal_position: u32,
    quote_currency: String,
    pip_class: PipSizeClass,
}

impl CurrencyPairMeta {
    pub fn new(
        symbol: &str,
        contract_size: f64,
        pip_decimal_position: u32,
        quote_currency: &str,
    ) -> Result<Self, PairError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(PairError::EmptySymbol);
        }
        if !contract_size.is_finite() || contract_size <= 0.0 {
            return Err(PairError::ContractSize {
                symbol,
                value: contract_size,
            });
        }
        let pip_class = match PipSizeClass::from_decimal_position(pip_decimal_position) {
            Some(class) => class,
            None => {
                return Err(PairError::PipDecimalPosition {
                    symbol,
                    value: pip_decimal_position,
                })
            }
        };
        let quote_currency = quote_currency.trim().to_uppercase();
        if quote_currency.is_empty() {
            return Err(PairError::EmptyQuote { symbol });
        }

        Ok(Self {
            symbol,
            contract_size,
            pip_decimal_position,
            quote_currency,
            pip_class,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn contract_size(&self) -> f64 {
        self.contract_size
    }

    pub fn pip_decimal_position(&self) -> u32 {
        self.pip_decimal_position
    }

    pub fn quote_currency(&self) -> &str {
        &self.quote_currency
    }

    pub fn pip_class(&self) -> PipSizeClass {
        self.pip_class
    }

    pub fn pip_size(&self) -> f64 {
        self.pip_class.pip_size()
    }

    pub fn is_jpy_quoted(&self) -> bool {
        self.quote_currency == "JPY"
    }

    /// Symbol with separators stripped, e.g. "USDJPY".
    fn compact_symbol(&self) -> String {
        compact(&self.symbol)
    }
}

impl TryFrom<PairRow> for CurrencyPairMeta {
    type Error = PairError;

    fn try_from(row: PairRow) -> Result<Self, Self::Error> {
        CurrencyPairMeta::new(
            &row.symbol,
            row.contract_size,
            row.pip_decimal_position,
            &row.quote_currency,
        )
    }
}

impl From<CurrencyPairMeta> for PairRow {
    fn from(pair: CurrencyPairMeta) -> Self {
        PairRow {
            symbol: pair.symbol,
            contract_size: pair.contract_size,
            pip_decimal_position: pair.pip_decimal_position,
            quote_currency: pair.quote_currency,
        }
    }
}

impl fmt::Display for CurrencyPairMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

fn compact(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}

const STANDARD_LOT: f64 = 100_000.0;
const GOLD_LOT: f64 = 100.0;

/// (symbol, contract size, pip decimal position, quote currency)
const CATALOG: &[(&str, f64, u32, &str)] = &[
    ("USD/JPY", STANDARD_LOT, 3, "JPY"),
    ("EUR/JPY", STANDARD_LOT, 3, "JPY"),
    ("GBP/JPY", STANDARD_LOT, 3, "JPY"),
    ("AUD/JPY", STANDARD_LOT, 3, "JPY"),
    ("NZD/JPY", STANDARD_LOT, 3, "JPY"),
    ("CAD/JPY", STANDARD_LOT, 3, "JPY"),
    ("CHF/JPY", STANDARD_LOT, 3, "JPY"),
    ("EUR/USD", STANDARD_LOT, 5, "USD"),
    ("GBP/USD", STANDARD_LOT, 5, "USD"),
    ("AUD/USD", STANDARD_LOT, 5, "USD"),
    ("NZD/USD", STANDARD_LOT, 5, "USD"),
    ("USD/CAD", STANDARD_LOT, 5, "CAD"),
    ("USD/CHF", STANDARD_LOT, 5, "CHF"),
    ("EUR/GBP", STANDARD_LOT, 5, "GBP"),
    ("EUR/AUD", STANDARD_LOT, 5, "AUD"),
    ("GBP/AUD", STANDARD_LOT, 5, "AUD"),
    ("GBP/NZD", STANDARD_LOT, 5, "NZD"),
    ("AUD/NZD", STANDARD_LOT, 5, "NZD"),
    ("XAU/USD", GOLD_LOT, 2, "USD"),
];

/// Built-in pair list, standard-lot convention.
pub fn default_catalog() -> Vec<CurrencyPairMeta> {
    CATALOG
        .iter()
        .filter_map(|&(symbol, size, pos, quote)| CurrencyPairMeta::new(symbol, size, pos, quote).ok())
        .collect()
}

/// Order pairs the way the pair picker shows them for `locale`.
///
/// Japanese members see JPY-quoted pairs first. Within a group pairs are
/// alphabetical by symbol.
pub fn sort_for_locale(pairs: &mut [CurrencyPairMeta], locale: Locale) {
    pairs.sort_by(|a, b| {
        let group = match locale {
            Locale::Ja => b.is_jpy_quoted().cmp(&a.is_jpy_quoted()),
            Locale::En => Ordering::Equal,
        };
        group.then_with(|| a.symbol.cmp(&b.symbol))
    });
}

/// Look up a pair by symbol, ignoring case and separators ("usdjpy" finds "USD/JPY").
pub fn find_pair<'a>(pairs: &'a [CurrencyPairMeta], symbol: &str) -> Option<&'a CurrencyPairMeta> {
    let wanted = compact(symbol);
    if wanted.is_empty() {
        return None;
    }
    pairs.iter().find(|p| p.compact_symbol() == wanted)
}
