//! Error types for core value parsing.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid time of day '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid candle interval: {0}")]
    InvalidInterval(String),

    #[error("Invalid UTC offset: {0} hours")]
    InvalidOffset(i32),
}
