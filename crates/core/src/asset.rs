//! Asset symbols and the watchlist.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base asset ticker (e.g., "BTC", "ETH").
///
/// Always stored upper-cased so user input like `btc` and configured `BTC`
/// refer to the same asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "CompactString")]
pub struct Symbol(CompactString);

impl Symbol {
    /// Create a symbol, normalizing to upper case.
    pub fn new(symbol: &str) -> Self {
        Self(CompactString::new(symbol.trim().to_uppercase()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Exchange pair for this asset against `quote` (e.g., `BTCUSDT`).
    pub fn trading_pair(&self, quote: &str) -> String {
        format!("{}{}", self.0, quote.to_uppercase())
    }
}

impl From<CompactString> for Symbol {
    fn from(value: CompactString) -> Self {
        Self::new(value.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed set of symbols evaluated every monitor cycle.
///
/// Built once at startup. Order is preserved and duplicates are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct Watchlist {
    symbols: Vec<Symbol>,
}

impl Watchlist {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let mut unique: Vec<Symbol> = Vec::new();
        for symbol in symbols.into_iter().map(Into::into) {
            if symbol.as_str().is_empty() || unique.contains(&symbol) {
                continue;
            }
            unique.push(symbol);
        }
        Self { symbols: unique }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::new([
            "BTC", "ETH", "ADA", "CAKE", "PI", "SOL", "TRUMP", "XRP", "DOGE", "TRX",
        ])
    }
}

impl From<Vec<Symbol>> for Watchlist {
    fn from(symbols: Vec<Symbol>) -> Self {
        Self::new(symbols)
    }
}

impl From<Watchlist> for Vec<Symbol> {
    fn from(watchlist: Watchlist) -> Self {
        watchlist.symbols
    }
}
