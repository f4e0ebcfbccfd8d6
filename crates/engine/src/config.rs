//! Monitor configuration.

use chrono::{FixedOffset, Offset, Utc};
use pricebot_alerts::ChatId;
use pricebot_core::{AlertWindow, CandleInterval, Watchlist};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MonitorConfigError {
    #[error("Watchlist is empty")]
    EmptyWatchlist,
    #[error("Threshold must be positive, got {0}")]
    InvalidThreshold(f64),
    #[error("Poll interval must be non-zero")]
    ZeroPollInterval,
    #[error("At least two samples are needed, got {0}")]
    TooFewSamples(usize),
}

/// Configuration for the price monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Symbols evaluated every cycle.
    pub watchlist: Watchlist,
    /// Candle granularity.
    pub interval: CandleInterval,
    /// Candles requested per symbol.
    pub sample_count: usize,
    /// Minimum absolute move in percent to alert.
    pub threshold_pct: f64,
    /// Time of day during which alerts are sent.
    pub window: AlertWindow,
    /// Offset of the clock the window is expressed in.
    pub utc_offset: FixedOffset,
    /// Delay between cycles.
    pub poll_interval: Duration,
    /// Chat receiving alerts.
    pub chat_id: ChatId,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            watchlist: Watchlist::default(),
            interval: CandleInterval::FiveMinutes,
            sample_count: 2,
            threshold_pct: 5.0,
            window: AlertWindow::default(),
            // Asia/Ho_Chi_Minh, no DST
            utc_offset: FixedOffset::east_opt(7 * 3600).unwrap_or_else(|| Utc.fix()),
            poll_interval: Duration::from_secs(600),
            chat_id: ChatId(0),
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), MonitorConfigError> {
        if self.watchlist.is_empty() {
            return Err(MonitorConfigError::EmptyWatchlist);
        }
        if !(self.threshold_pct.is_finite() && self.threshold_pct > 0.0) {
            return Err(MonitorConfigError::InvalidThreshold(self.threshold_pct));
        }
        if self.poll_interval.is_zero() {
            return Err(MonitorConfigError::ZeroPollInterval);
        }
        if self.sample_count < 2 {
            return Err(MonitorConfigError::TooFewSamples(self.sample_count));
        }
        Ok(())
    }
}
