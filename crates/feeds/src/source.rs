//! Market data source abstraction.

use crate::FeedError;
use async_trait::async_trait;
use pricebot_core::{CandleInterval, PriceSample, Symbol, TickerSnapshot};

/// Source of candles, tickers and the dominance metric.
///
/// Every call is independent: no retries, no caching.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Up to `count` most recent samples for `symbol`, oldest first.
    ///
    /// Transport and status failures are errors. Malformed candles are
    /// dropped, so the result may be shorter than `count` or empty.
    async fn get_latest_samples(
        &self,
        symbol: &Symbol,
        interval: CandleInterval,
        count: usize,
    ) -> Result<Vec<PriceSample>, FeedError>;

    /// Last price and 24h change, `None` when unavailable.
    async fn get_ticker_snapshot(&self, symbol: &Symbol) -> Option<TickerSnapshot>;

    /// BTC share of total market capitalization in percent, `None` when unavailable.
    async fn get_dominance_metric(&self) -> Option<f64>;
}
