//! Price movement detection and alerting.
//!
//! Polls recent candles for every watched symbol and alerts the configured
//! chat when a short-window move reaches the threshold.

pub mod config;
pub mod monitor;

pub use config::*;
pub use monitor::*;
