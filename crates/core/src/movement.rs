//! Short-window price movement events.

use crate::{percent_change, SampleSeries, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a price move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Upward,
    Downward,
}

impl Direction {
    /// Zero counts as upward.
    pub fn from_change(pct: f64) -> Self {
        if pct < 0.0 {
            Direction::Downward
        } else {
            Direction::Upward
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Upward => "upward",
            Direction::Downward => "downward",
        }
    }

    /// Headline tag used in chat alerts.
    pub fn tag(self) -> &'static str {
        match self {
            Direction::Upward => "🚀 FOMO 🚀",
            Direction::Downward => "😱 FUD 😱",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage move of one symbol across its two latest samples.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementEvent {
    pub symbol: Symbol,
    pub change_pct: f64,
    pub direction: Direction,
    /// Minutes covered by the two samples
    pub window_minutes: u32,
}

impl MovementEvent {
    /// Build from the last two samples of a series.
    ///
    /// `None` if the series is shorter than two samples or the previous open
    /// is unusable.
    pub fn from_series(series: &SampleSeries) -> Option<Self> {
        let (previous, latest) = series.last_pair()?;
        let change_pct = percent_change(previous, latest)?;
        Some(Self {
            symbol: series.symbol.clone(),
            change_pct,
            direction: Direction::from_change(change_pct),
            window_minutes: series.interval.minutes() * 2,
        })
    }

    /// `abs(change) >= threshold_pct`.
    #[inline]
    pub fn exceeds(&self, threshold_pct: f64) -> bool {
        self.change_pct.abs() >= threshold_pct
    }
}
