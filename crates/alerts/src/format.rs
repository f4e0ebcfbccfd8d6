//! Chat message formatting.

use pricebot_core::{MovementEvent, Symbol, TickerSnapshot};

/// `12345.6789 USDT (+3.10%)`
pub fn format_price_change(last_price: f64, change_pct: f64, decimals: usize, quote: &str) -> String {
    format!("{:.*} {} ({:+.2}%)", decimals, last_price, quote, change_pct)
}

/// One `/p` reply line for a ticker.
pub fn format_ticker_line(
    symbol: &Symbol,
    snapshot: &TickerSnapshot,
    decimals: usize,
    quote: &str,
) -> String {
    format!(
        "💰 {}: {}",
        symbol,
        format_price_change(snapshot.last_price, snapshot.change_pct_24h, decimals, quote)
    )
}

pub fn format_ticker_unavailable(symbol: &Symbol) -> String {
    format!("⚠️ Unable to fetch {} price data!", symbol)
}

/// One `/p` reply line for the dominance metric.
pub fn format_dominance_line(dominance_pct: f64, timeframe: &str) -> String {
    format!(
        "📊 BTC Dominance: {:.2}% (timeframe: {})",
        dominance_pct, timeframe
    )
}

pub fn format_dominance_unavailable() -> String {
    "⚠️ Unable to fetch BTC Dominance data!".to_string()
}

/// Movement alert pushed by the monitor.
pub fn format_movement_alert(event: &MovementEvent) -> String {
    format!(
        "{} {} {} move {:+.2}% in {} minutes!",
        event.direction.tag(),
        event.symbol,
        event.direction,
        event.change_pct,
        event.window_minutes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pricebot_core::Direction;

    #[test]
    fn test_format_price_change() {
        assert_eq!(
            format_price_change(12345.6789, 3.1, 4, "USDT"),
            "12345.6789 USDT (+3.10%)"
        );
        assert_eq!(
            format_price_change(0.5, -12.346, 4, "USDT"),
            "0.5000 USDT (-12.35%)"
        );
        assert_eq!(format_price_change(1.0, 0.0, 2, "USDT"), "1.00 USDT (+0.00%)");
    }

    #[test]
    fn test_format_ticker_line() {
        let snapshot = TickerSnapshot {
            last_price: 12345.6789,
            change_pct_24h: 3.1,
        };
        assert_eq!(
            format_ticker_line(&Symbol::new("BTC"), &snapshot, 4, "USDT"),
            "💰 BTC: 12345.6789 USDT (+3.10%)"
        );
    }

    #[test]
    fn test_format_dominance_line() {
        assert_eq!(
            format_dominance_line(54.2149, "15m"),
            "📊 BTC Dominance: 54.21% (timeframe: 15m)"
        );
    }

    #[test]
    fn test_format_movement_alert() {
        let up = MovementEvent {
            symbol: Symbol::new("SOL"),
            change_pct: 5.234,
            direction: Direction::Upward,
            window_minutes: 10,
        };
        assert_eq!(
            format_movement_alert(&up),
            "🚀 FOMO 🚀 SOL upward move +5.23% in 10 minutes!"
        );

        let down = MovementEvent {
            symbol: Symbol::new("DOGE"),
            change_pct: -7.0,
            direction: Direction::Downward,
            window_minutes: 10,
        };
        assert_eq!(
            format_movement_alert(&down),
            "😱 FUD 😱 DOGE downward move -7.00% in 10 minutes!"
        );
    }
}
