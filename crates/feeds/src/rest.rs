//! REST market data fetchers.
//!
//! Candles and tickers come from the MEXC spot v3 API, the dominance metric
//! from the CoinGecko `/global` endpoint.

use crate::{FeedError, MarketData};
use async_trait::async_trait;
use pricebot_core::{CandleInterval, PriceSample, Symbol, TickerSnapshot};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Endpoints and request settings for [`RestMarketData`].
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Exchange API root, e.g. `https://api.mexc.com/api/v3`
    pub exchange_base_url: String,
    /// Market cap aggregator root, e.g. `https://api.coingecko.com/api/v3`
    pub market_cap_base_url: String,
    /// Quote asset appended to every symbol
    pub quote_asset: String,
    /// Asset whose market cap share is reported as dominance
    pub dominance_asset: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            exchange_base_url: "https://api.mexc.com/api/v3".to_string(),
            market_cap_base_url: "https://api.coingecko.com/api/v3".to_string(),
            quote_asset: "USDT".to_string(),
            dominance_asset: "btc".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP-backed market data source.
#[derive(Debug, Clone)]
pub struct RestMarketData {
    http: reqwest::Client,
    config: RestConfig,
}

impl RestMarketData {
    pub fn new(config: RestConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// GET `url` and decode the body as JSON; non-2xx is an error.
    async fn get_json(
        &self,
        endpoint: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Value, FeedError> {
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl MarketData for RestMarketData {
    async fn get_latest_samples(
        &self,
        symbol: &Symbol,
        interval: CandleInterval,
        count: usize,
    ) -> Result<Vec<PriceSample>, FeedError> {
        let url = format!("{}/klines", self.config.exchange_base_url);
        let query = [
            ("symbol", symbol.trading_pair(&self.config.quote_asset)),
            ("interval", interval.as_str().to_string()),
            ("limit", count.to_string()),
        ];

        let json = self.get_json("klines", &url, &query).await?;
        let samples = parse_klines(&json, count);
        debug!(
            symbol = %symbol,
            interval = %interval,
            received = samples.len(),
            "Fetched klines"
        );
        Ok(samples)
    }

    async fn get_ticker_snapshot(&self, symbol: &Symbol) -> Option<TickerSnapshot> {
        let url = format!("{}/ticker/24hr", self.config.exchange_base_url);
        let query = [("symbol", symbol.trading_pair(&self.config.quote_asset))];

        let json = match self.get_json("ticker/24hr", &url, &query).await {
            Ok(j) => j,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Ticker unavailable");
                return None;
            }
        };

        let snapshot = parse_ticker(&json);
        if snapshot.is_none() {
            warn!(symbol = %symbol, "Ticker response missing lastPrice/priceChangePercent");
        }
        snapshot
    }

    async fn get_dominance_metric(&self) -> Option<f64> {
        let url = format!("{}/global", self.config.market_cap_base_url);

        let json = match self.get_json("global", &url, &[]).await {
            Ok(j) => j,
            Err(e) => {
                warn!(error = %e, "Dominance metric unavailable");
                return None;
            }
        };

        let dominance = parse_dominance(&json, &self.config.dominance_asset);
        if dominance.is_none() {
            warn!(
                asset = %self.config.dominance_asset,
                "Global response missing market_cap_percentage"
            );
        }
        dominance
    }
}

/// Number or numeric string.
fn value_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
        .filter(|v| v.is_finite())
}

fn value_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
}

/// Parse a klines array into samples, oldest first, keeping the last `count`.
///
/// Response is array: `[[openTime, "open", "high", "low", "close", ...], ...]`.
/// Candles with missing or non-positive prices are dropped.
pub fn parse_klines(json: &Value, count: usize) -> Vec<PriceSample> {
    let Some(candles) = json.as_array() else {
        debug!("Klines response is not an array");
        return Vec::new();
    };

    let mut samples: Vec<PriceSample> = candles
        .iter()
        .filter_map(|candle| {
            let fields = candle.as_array()?;
            let open_time_ms = value_i64(fields.first()?)?;
            let open = value_f64(fields.get(1)?)?;
            let close = value_f64(fields.get(4)?)?;
            let sample = PriceSample::new(open_time_ms, open, close);
            sample.is_valid().then_some(sample)
        })
        .collect();

    samples.sort_by_key(|s| s.open_time_ms);
    if samples.len() > count {
        let excess = samples.len() - count;
        samples.drain(..excess);
    }
    samples
}

/// Parse `{lastPrice, priceChangePercent}`.
pub fn parse_ticker(json: &Value) -> Option<TickerSnapshot> {
    Some(TickerSnapshot {
        last_price: value_f64(&json["lastPrice"])?,
        change_pct_24h: value_f64(&json["priceChangePercent"])?,
    })
}

/// Parse `{data: {market_cap_percentage: {<asset>: <float>}}}`.
pub fn parse_dominance(json: &Value, asset: &str) -> Option<f64> {
    value_f64(&json["data"]["market_cap_percentage"][asset.to_lowercase()])
}
