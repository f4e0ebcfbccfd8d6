//! Time-of-day alert windows.

use crate::CoreError;
use chrono::{FixedOffset, NaiveTime, Utc};

/// Time-of-day range during which alerts may be sent.
///
/// The variant is fixed when the window is built: a start at or before the
/// end is a same-day window, anything else wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertWindow {
    /// `start <= now <= end`
    SameDay { start: NaiveTime, end: NaiveTime },
    /// `now >= start || now <= end`
    Overnight { start: NaiveTime, end: NaiveTime },
}

impl AlertWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        if start <= end {
            AlertWindow::SameDay { start, end }
        } else {
            AlertWindow::Overnight { start, end }
        }
    }

    /// Parse `HH:MM` bounds.
    pub fn parse(start: &str, end: &str) -> Result<Self, CoreError> {
        Ok(Self::new(parse_time_of_day(start)?, parse_time_of_day(end)?))
    }

    pub fn contains(&self, now: NaiveTime) -> bool {
        match *self {
            AlertWindow::SameDay { start, end } => start <= now && now <= end,
            AlertWindow::Overnight { start, end } => start <= now || now <= end,
        }
    }

    pub fn start(&self) -> NaiveTime {
        match *self {
            AlertWindow::SameDay { start, .. } | AlertWindow::Overnight { start, .. } => start,
        }
    }

    pub fn end(&self) -> NaiveTime {
        match *self {
            AlertWindow::SameDay { end, .. } | AlertWindow::Overnight { end, .. } => end,
        }
    }

    pub fn is_overnight(&self) -> bool {
        matches!(self, AlertWindow::Overnight { .. })
    }
}

impl Default for AlertWindow {
    /// 07:00 to 21:30.
    fn default() -> Self {
        Self::new(
            NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN),
            NaiveTime::from_hms_opt(21, 30, 0).unwrap_or(NaiveTime::MIN),
        )
    }
}

impl std::fmt::Display for AlertWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start().format("%H:%M"),
            self.end().format("%H:%M")
        )
    }
}

/// Parse `HH:MM` (or `HH:MM:SS`).
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, CoreError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| CoreError::InvalidTime(value.to_string()))
}

/// Fixed UTC offset in whole hours (±14).
pub fn utc_offset(hours: i32) -> Result<FixedOffset, CoreError> {
    if !(-14..=14).contains(&hours) {
        return Err(CoreError::InvalidOffset(hours));
    }
    FixedOffset::east_opt(hours * 3600).ok_or(CoreError::InvalidOffset(hours))
}

/// Current wall-clock time of day at `offset`.
pub fn local_time_of_day(offset: FixedOffset) -> NaiveTime {
    Utc::now().with_timezone(&offset).time()
}
