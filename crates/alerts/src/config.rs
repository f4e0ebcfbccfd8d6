//! Command responder configuration.

use pricebot_core::Symbol;
use std::time::Duration;

/// Settings for [`crate::CommandResponder`].
#[derive(Debug, Clone)]
pub struct ResponderConfig {
    /// Timeframe label used when the `/p` command does not name one
    pub default_timeframe: String,
    /// Pseudo-symbols answered with the dominance metric
    pub dominance_aliases: Vec<Symbol>,
    /// Delay before a price reply and its command are deleted
    pub cleanup_delay: Duration,
    /// Decimal places for last price
    pub price_decimals: usize,
    /// Quote asset shown after prices
    pub quote_asset: String,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            default_timeframe: "15m".to_string(),
            dominance_aliases: vec![Symbol::new("BTC.D"), Symbol::new("DOM")],
            cleanup_delay: Duration::from_secs(30),
            price_decimals: 4,
            quote_asset: "USDT".to_string(),
        }
    }
}

impl ResponderConfig {
    /// Check if a symbol should be answered with the dominance metric.
    pub fn is_dominance_alias(&self, symbol: &Symbol) -> bool {
        self.dominance_aliases.iter().any(|alias| alias == symbol)
    }
}
