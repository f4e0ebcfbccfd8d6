//! Scripted market data source for testing.

use crate::{FeedError, MarketData};
use async_trait::async_trait;
use pricebot_core::{CandleInterval, PriceSample, Symbol, TickerSnapshot};
use std::collections::HashMap;
use std::sync::Mutex;

/// A call received by [`MockMarketData`].
#[derive(Debug, Clone, PartialEq)]
pub enum MarketCall {
    Samples(Symbol, CandleInterval, usize),
    Ticker(Symbol),
    Dominance,
}

/// In-memory [`MarketData`] with canned responses.
///
/// Symbols without scripted samples return an empty series; symbols without
/// a ticker are unavailable.
#[derive(Default)]
pub struct MockMarketData {
    samples: HashMap<Symbol, Vec<PriceSample>>,
    failing: Vec<Symbol>,
    tickers: HashMap<Symbol, TickerSnapshot>,
    dominance: Option<f64>,
    calls: Mutex<Vec<MarketCall>>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(mut self, symbol: &str, samples: Vec<PriceSample>) -> Self {
        self.samples.insert(Symbol::new(symbol), samples);
        self
    }

    /// Two consecutive samples moving from `open` to `close`.
    pub fn with_move(self, symbol: &str, open: f64, close: f64) -> Self {
        self.with_samples(
            symbol,
            vec![
                PriceSample::new(0, open, open),
                PriceSample::new(300_000, open, close),
            ],
        )
    }

    /// Sample requests for `symbol` fail with an HTTP error.
    pub fn with_failure(mut self, symbol: &str) -> Self {
        self.failing.push(Symbol::new(symbol));
        self
    }

    pub fn with_ticker(mut self, symbol: &str, last_price: f64, change_pct_24h: f64) -> Self {
        self.tickers.insert(
            Symbol::new(symbol),
            TickerSnapshot {
                last_price,
                change_pct_24h,
            },
        );
        self
    }

    pub fn with_dominance(mut self, dominance: f64) -> Self {
        self.dominance = Some(dominance);
        self
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<MarketCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn ticker_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MarketCall::Ticker(_)))
            .count()
    }

    pub fn dominance_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MarketCall::Dominance))
            .count()
    }

    fn record(&self, call: MarketCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl MarketData for MockMarketData {
    async fn get_latest_samples(
        &self,
        symbol: &Symbol,
        interval: CandleInterval,
        count: usize,
    ) -> Result<Vec<PriceSample>, FeedError> {
        self.record(MarketCall::Samples(symbol.clone(), interval, count));
        if self.failing.contains(symbol) {
            return Err(FeedError::Http(format!("mock failure for {}", symbol)));
        }
        let samples = self.samples.get(symbol).cloned().unwrap_or_default();
        let skip = samples.len().saturating_sub(count);
        Ok(samples.into_iter().skip(skip).collect())
    }

    async fn get_ticker_snapshot(&self, symbol: &Symbol) -> Option<TickerSnapshot> {
        self.record(MarketCall::Ticker(symbol.clone()));
        self.tickers.get(symbol).copied()
    }

    async fn get_dominance_metric(&self) -> Option<f64> {
        self.record(MarketCall::Dominance);
        self.dominance
    }
}
