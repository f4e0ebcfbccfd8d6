//! Market data collection over exchange REST APIs.
//!
//! - `source` - the `MarketData` trait consumed by the monitor and the bot
//! - `rest` - MEXC spot and CoinGecko implementation plus JSON parsers
//! - `mock` - scripted in-memory source for tests

pub mod error;
pub mod mock;
pub mod rest;
pub mod source;

pub use error::*;
pub use mock::{MarketCall, MockMarketData};
pub use rest::*;
pub use source::MarketData;
