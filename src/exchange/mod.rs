pub mod fixed;
pub mod http;

pub use fixed::FixedRateSource;
pub use http::HttpRateSource;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;

/// Where JPY conversion rates come from.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// JPY value of one unit of `quote` (an ISO code such as "USD").
    async fn fetch_jpy_rate(&mut self, quote: &str) -> Result<f64>;
}

/// Resolves the JPY rate the sizing form needs. Never fails: JPY is 1.0
/// without a lookup, and any lookup problem degrades to the fallback rate.
pub struct JpyRateResolver {
    source: Box<dyn RateSource>,
    fallback: f64,
}

impl JpyRateResolver {
    pub fn new(source: Box<dyn RateSource>, fallback: f64) -> Self {
        Self { source, fallback }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let source: Box<dyn RateSource> = if cfg.offline {
            Box::new(FixedRateSource::reference())
        } else {
            Box::new(HttpRateSource::new(cfg))
        };
        Self::new(source, cfg.rate_fallback)
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }

    pub async fn get_jpy_rate(&mut self, quote: &str) -> f64 {
        let quote = quote.trim().to_uppercase();
        if quote == "JPY" {
            return 1.0;
        }

        match self.source.fetch_jpy_rate(&quote).await {
            Ok(rate) if rate.is_finite() && rate > 0.0 => {
                debug!("JPY rate for {}: {}", quote, rate);
                rate
            }
            Ok(rate) => {
                warn!(
                    "Unusable JPY rate {} for {}, using fallback {}",
                    rate, quote, self.fallback
                );
                self.fallback
            }
            Err(e) => {
                warn!(
                    "JPY rate lookup for {} failed: {:#}, using fallback {}",
                    quote, e, self.fallback
                );
                self.fallback
            }
        }
    }
}
