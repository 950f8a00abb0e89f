pub mod currency_pair;
pub mod locale;

pub use currency_pair::{CurrencyPairMeta, PairError, PipSizeClass};
pub use locale::Locale;
