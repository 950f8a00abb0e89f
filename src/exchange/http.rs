use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::exchange::RateSource;

const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(250);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    #[serde(default)]
    rates: HashMap<String, f64>,
    #[serde(rename = "error-type", default)]
    error_type: Option<String>,
}

/// Pull the JPY quote out of a `/latest/{BASE}` response body.
pub fn parse_jpy_rate(body: &str) -> Result<f64> {
    let data: LatestRatesResponse =
        serde_json::from_str(body).context("Failed to parse rate response")?;

    if data.result != "success" {
        anyhow::bail!(
            "Rate API returned {}: {}",
            data.result,
            data.error_type.unwrap_or_default()
        );
    }

    data.rates
        .get("JPY")
        .copied()
        .context("No JPY rate in response")
}

/// RateSource backed by an open exchange-rate REST endpoint
/// (`GET {base_url}/{QUOTE}`).
pub struct HttpRateSource {
    client: Client,
    base_url: String,
    last_request: Option<Instant>,
    cache: HashMap<String, (Instant, f64)>,
    cache_ttl: Duration,
}

impl HttpRateSource {
    pub fn new(cfg: &Config) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: cfg.rate_api_url.trim_end_matches('/').to_string(),
            last_request: None,
            cache: HashMap::new(),
            cache_ttl: Duration::from_secs(cfg.rate_cache_secs),
        }
    }

    async fn rate_limit(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    fn cached(&self, quote: &str) -> Option<f64> {
        self.cache
            .get(quote)
            .filter(|(fetched_at, _)| fetched_at.elapsed() < self.cache_ttl)
            .map(|&(_, rate)| rate)
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_jpy_rate(&mut self, quote: &str) -> Result<f64> {
        let quote = quote.to_uppercase();
        if let Some(rate) = self.cached(&quote) {
            return Ok(rate);
        }

        self.rate_limit().await;

        let resp = self
            .client
            .get(format!("{}/{}", self.base_url, quote))
            .send()
            .await
            .context("Failed to fetch exchange rates")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Rate API error {}: {}", status, body);
        }

        let body = resp.text().await.context("Failed to read rate response")?;
        let rate = parse_jpy_rate(&body)?;

        self.cache.insert(quote, (Instant::now(), rate));

        Ok(rate)
    }
}
