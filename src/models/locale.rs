use serde::{Deserialize, Serialize};
use std::fmt;

/// Display locale of the journal UI. Drives pair ordering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ja,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Ja => "ja",
            Locale::En => "en",
        }
    }

    /// Accepts "ja", "ja-JP", "ja_JP.UTF-8", "en", "en-US", ...
    pub fn from_str_loose(s: &str) -> Option<Locale> {
        let lang = s
            .trim()
            .split(|c| c == '-' || c == '_' || c == '.')
            .next()?
            .to_lowercase();
        match lang.as_str() {
            "ja" => Some(Locale::Ja),
            "en" => Some(Locale::En),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
