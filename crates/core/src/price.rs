//! Price data structures for polled market data.

use crate::{CoreError, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Candle granularity, using the exchange wire labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CandleInterval {
    #[serde(rename = "1m")]
    OneMinute,
    #[default]
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "60m")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl CandleInterval {
    pub const ALL: [CandleInterval; 7] = [
        CandleInterval::OneMinute,
        CandleInterval::FiveMinutes,
        CandleInterval::FifteenMinutes,
        CandleInterval::ThirtyMinutes,
        CandleInterval::OneHour,
        CandleInterval::FourHours,
        CandleInterval::OneDay,
    ];

    /// Label sent as the `interval` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            CandleInterval::OneMinute => "1m",
            CandleInterval::FiveMinutes => "5m",
            CandleInterval::FifteenMinutes => "15m",
            CandleInterval::ThirtyMinutes => "30m",
            CandleInterval::OneHour => "60m",
            CandleInterval::FourHours => "4h",
            CandleInterval::OneDay => "1d",
        }
    }

    pub fn minutes(self) -> u32 {
        match self {
            CandleInterval::OneMinute => 1,
            CandleInterval::FiveMinutes => 5,
            CandleInterval::FifteenMinutes => 15,
            CandleInterval::ThirtyMinutes => 30,
            CandleInterval::OneHour => 60,
            CandleInterval::FourHours => 240,
            CandleInterval::OneDay => 1440,
        }
    }
}

impl fmt::Display for CandleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandleInterval {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // "1h" is accepted as an alias for the exchange's "60m".
        if s.eq_ignore_ascii_case("1h") {
            return Ok(CandleInterval::OneHour);
        }
        Self::ALL
            .into_iter()
            .find(|interval| interval.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidInterval(s.to_string()))
    }
}

/// Open and close of one candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Candle open time in milliseconds since epoch
    pub open_time_ms: i64,
    pub open: f64,
    pub close: f64,
}

impl PriceSample {
    pub fn new(open_time_ms: i64, open: f64, close: f64) -> Self {
        Self {
            open_time_ms,
            open,
            close,
        }
    }

    /// Both prices finite and positive.
    pub fn is_valid(&self) -> bool {
        self.open.is_finite() && self.close.is_finite() && self.open > 0.0 && self.close > 0.0
    }
}

/// Samples for one symbol at one interval, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    pub symbol: Symbol,
    pub interval: CandleInterval,
    pub samples: Vec<PriceSample>,
}

impl SampleSeries {
    /// The two most recent samples as `(previous, latest)`.
    pub fn last_pair(&self) -> Option<(&PriceSample, &PriceSample)> {
        match self.samples.as_slice() {
            [.., previous, latest] => Some((previous, latest)),
            _ => None,
        }
    }
}

/// Last traded price and 24h change for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    pub last_price: f64,
    /// 24h change in percent (3.1 means +3.1%)
    pub change_pct_24h: f64,
}

/// Percentage change from the open of `previous` to the close of `latest`.
///
/// Returns `None` when the previous open is not a positive finite number.
pub fn percent_change(previous: &PriceSample, latest: &PriceSample) -> Option<f64> {
    if !previous.open.is_finite() || previous.open <= 0.0 || !latest.close.is_finite() {
        return None;
    }
    Some((latest.close - previous.open) / previous.open * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_percent_change_formula() {
        let previous = PriceSample::new(0, 100.0, 101.0);
        let latest = PriceSample::new(300_000, 102.0, 106.0);
        let pct = percent_change(&previous, &latest).unwrap();
        assert!((pct - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_change_negative() {
        let previous = PriceSample::new(0, 0.25, 0.24);
        let latest = PriceSample::new(300_000, 0.24, 0.2);
        let pct = percent_change(&previous, &latest).unwrap();
        assert!((pct - (0.2 - 0.25) / 0.25 * 100.0).abs() < 1e-9);
        assert!(pct < 0.0);
    }

    #[test]
    fn test_percent_change_rejects_zero_open() {
        let previous = PriceSample::new(0, 0.0, 1.0);
        let latest = PriceSample::new(1, 1.0, 1.0);
        assert_eq!(percent_change(&previous, &latest), None);
    }

    #[test]
    fn test_last_pair() {
        let series = SampleSeries {
            symbol: Symbol::new("BTC"),
            interval: CandleInterval::FiveMinutes,
            samples: vec![
                PriceSample::new(1, 1.0, 1.0),
                PriceSample::new(2, 2.0, 2.0),
                PriceSample::new(3, 3.0, 3.0),
            ],
        };
        let (previous, latest) = series.last_pair().unwrap();
        assert_eq!(previous.open_time_ms, 2);
        assert_eq!(latest.open_time_ms, 3);

        let short = SampleSeries {
            samples: vec![PriceSample::new(1, 1.0, 1.0)],
            ..series
        };
        assert!(short.last_pair().is_none());
    }

    #[test]
    fn test_interval_labels_round_trip() {
        for interval in CandleInterval::ALL {
            assert_eq!(interval.as_str().parse::<CandleInterval>().unwrap(), interval);
        }
        assert_eq!("1h".parse::<CandleInterval>().unwrap(), CandleInterval::OneHour);
        assert!("7m".parse::<CandleInterval>().is_err());
    }

    #[test]
    fn test_interval_serde_uses_wire_label() {
        let json = serde_json::to_string(&CandleInterval::FiveMinutes).unwrap();
        assert_eq!(json, "\"5m\"");
    }

    #[test]
    fn test_sample_validity() {
        assert!(PriceSample::new(0, 1.0, 2.0).is_valid());
        assert!(!PriceSample::new(0, -1.0, 2.0).is_valid());
        assert!(!PriceSample::new(0, f64::NAN, 2.0).is_valid());
    }
}
