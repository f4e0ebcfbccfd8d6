//! Price movement monitor.
//!
//! Polls the watchlist on a fixed cadence and pushes an alert for every
//! symbol whose short-window move reaches the threshold while the alert
//! window is open.

use crate::MonitorConfig;
use chrono::NaiveTime;
use pricebot_alerts::format::format_movement_alert;
use pricebot_alerts::Messenger;
use pricebot_core::{local_time_of_day, MovementEvent, SampleSeries, Symbol};
use pricebot_feeds::{FeedError, MarketData};
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Time-of-day source used to gate alerts.
pub type Clock = Box<dyn Fn() -> NaiveTime + Send + Sync>;

/// Outcome counters for one evaluation cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Symbols with a computed movement
    pub evaluated: usize,
    /// Symbols with fewer than two usable samples
    pub skipped: usize,
    /// Symbols whose fetch failed
    pub failed: usize,
    /// Moves at or above threshold
    pub triggered: usize,
    /// Triggered moves not sent because the window was closed
    pub suppressed: usize,
    pub alerts_sent: usize,
    pub send_failures: usize,
}

/// Windowed price movement alerting over a fixed watchlist.
pub struct PriceMonitor {
    market: Arc<dyn MarketData>,
    messenger: Arc<dyn Messenger>,
    config: MonitorConfig,
    clock: Clock,
}

impl PriceMonitor {
    /// Create a monitor that reads the wall clock at the configured offset.
    pub fn new(
        market: Arc<dyn MarketData>,
        messenger: Arc<dyn Messenger>,
        config: MonitorConfig,
    ) -> Self {
        let offset = config.utc_offset;
        Self {
            market,
            messenger,
            config,
            clock: Box::new(move || local_time_of_day(offset)),
        }
    }

    /// Replace the time-of-day source.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Evaluate every watched symbol once at the current time of day.
    pub async fn evaluate_once(&self) -> CycleReport {
        let now = (self.clock)();
        self.evaluate_at(now).await
    }

    /// Evaluate every watched symbol once as if the time of day were `now`.
    ///
    /// A failure for one symbol is logged and never stops the others.
    pub async fn evaluate_at(&self, now: NaiveTime) -> CycleReport {
        let window_open = self.config.window.contains(now);
        let mut report = CycleReport::default();

        for symbol in self.config.watchlist.iter() {
            let event = match self.movement(symbol).await {
                Ok(Some(event)) => event,
                Ok(None) => {
                    warn!(symbol = %symbol, "Not enough samples, skipping");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!(symbol = %symbol, error = %e, "Failed to fetch samples");
                    report.failed += 1;
                    continue;
                }
            };
            report.evaluated += 1;

            if !event.exceeds(self.config.threshold_pct) {
                debug!(symbol = %symbol, change_pct = event.change_pct, "Below threshold");
                continue;
            }
            report.triggered += 1;

            if !window_open {
                debug!(
                    symbol = %symbol,
                    change_pct = event.change_pct,
                    window = %self.config.window,
                    "Skipping alert: outside alert window"
                );
                report.suppressed += 1;
                continue;
            }

            let message = format_movement_alert(&event);
            match self.messenger.send_message(self.config.chat_id, &message).await {
                Ok(_) => {
                    info!(
                        symbol = %symbol,
                        change_pct = event.change_pct,
                        direction = %event.direction,
                        "Alert sent"
                    );
                    report.alerts_sent += 1;
                }
                Err(e) => {
                    error!(symbol = %symbol, error = %e, "Failed to send alert");
                    report.send_failures += 1;
                }
            }
        }

        report
    }

    /// Latest movement for `symbol`, `None` if the samples are unusable.
    async fn movement(&self, symbol: &Symbol) -> Result<Option<MovementEvent>, FeedError> {
        let samples = self
            .market
            .get_latest_samples(symbol, self.config.interval, self.config.sample_count)
            .await?;

        let series = SampleSeries {
            symbol: symbol.clone(),
            interval: self.config.interval,
            samples,
        };
        Ok(MovementEvent::from_series(&series))
    }

    /// Run forever, one evaluation per poll interval.
    pub async fn run(self: Arc<Self>) {
        info!(
            symbols = self.config.watchlist.len(),
            interval = %self.config.interval,
            threshold_pct = self.config.threshold_pct,
            window = %self.config.window,
            poll_secs = self.config.poll_interval.as_secs(),
            "Starting price monitor"
        );

        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let report = self.evaluate_once().await;
            if report.failed > 0 && report.failed == self.config.watchlist.len() {
                error!(failed = report.failed, "Every symbol failed this cycle");
            } else {
                debug!(
                    evaluated = report.evaluated,
                    skipped = report.skipped,
                    failed = report.failed,
                    alerts = report.alerts_sent,
                    "Monitor cycle complete"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pricebot_alerts::{ChatId, MockMessenger};
    use pricebot_core::{AlertWindow, PriceSample, Watchlist};
    use pricebot_feeds::{MarketCall, MockMarketData};
    use std::time::Duration;

    const CHAT: ChatId = ChatId(-100555);

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn config(symbols: &[&str]) -> MonitorConfig {
        MonitorConfig {
            watchlist: Watchlist::new(symbols.iter().copied()),
            chat_id: CHAT,
            ..Default::default()
        }
    }

    fn monitor(
        market: MockMarketData,
        config: MonitorConfig,
    ) -> (PriceMonitor, Arc<MockMarketData>, Arc<MockMessenger>) {
        let market = Arc::new(market);
        let messenger = Arc::new(MockMessenger::new());
        let monitor = PriceMonitor::new(market.clone(), messenger.clone(), config);
        (monitor, market, messenger)
    }

    #[tokio::test]
    async fn test_alert_inside_window() {
        let (monitor, _market, messenger) = monitor(
            MockMarketData::new()
                .with_move("BTC", 100.0, 106.0)
                .with_move("ETH", 100.0, 101.0),
            config(&["BTC", "ETH"]),
        );

        let report = monitor.evaluate_at(t(12, 0)).await;

        assert_eq!(report.evaluated, 2);
        assert_eq!(report.alerts_sent, 1);
        let sent = messenger.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, CHAT);
        assert_eq!(sent[0].text, "🚀 FOMO 🚀 BTC upward move +6.00% in 10 minutes!");
    }

    #[tokio::test]
    async fn test_downward_alert() {
        let (monitor, _market, messenger) = monitor(
            MockMarketData::new().with_move("DOGE", 0.2, 0.18),
            config(&["DOGE"]),
        );

        monitor.evaluate_at(t(8, 0)).await;

        assert_eq!(
            messenger.sent()[0].text,
            "😱 FUD 😱 DOGE downward move -10.00% in 10 minutes!"
        );
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let (monitor, _market, messenger) = monitor(
            MockMarketData::new().with_move("SOL", 200.0, 210.0),
            config(&["SOL"]),
        );

        let report = monitor.evaluate_at(t(9, 0)).await;

        assert_eq!(report.triggered, 1);
        assert_eq!(messenger.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_percent_uses_previous_open_and_latest_close() {
        let market = MockMarketData::new().with_samples(
            "ETH",
            vec![
                PriceSample::new(0, 2000.0, 2500.0),
                PriceSample::new(300_000, 2500.0, 2090.0),
            ],
        );
        let (monitor, _market, messenger) = monitor(market, config(&["ETH"]));

        monitor.evaluate_at(t(10, 0)).await;

        // (2090 - 2000) / 2000 * 100 = 4.5, below the 5% default
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn test_no_alert_outside_window() {
        let (monitor, market, messenger) = monitor(
            MockMarketData::new().with_move("BTC", 100.0, 120.0),
            config(&["BTC"]),
        );

        let report = monitor.evaluate_at(t(22, 0)).await;

        assert_eq!(report.triggered, 1);
        assert_eq!(report.suppressed, 1);
        assert!(messenger.sent().is_empty());
        // Evaluation still ran
        assert_eq!(market.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_overnight_window() {
        let mut cfg = config(&["BTC"]);
        cfg.window = AlertWindow::parse("21:30", "06:00").unwrap();
        let (monitor, _market, messenger) =
            monitor(MockMarketData::new().with_move("BTC", 100.0, 110.0), cfg);

        monitor.evaluate_at(t(23, 0)).await;
        assert_eq!(messenger.sent().len(), 1);

        monitor.evaluate_at(t(12, 0)).await;
        assert_eq!(messenger.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_symbol_does_not_stop_others() {
        let (monitor, market, messenger) = monitor(
            MockMarketData::new()
                .with_move("BTC", 100.0, 110.0)
                .with_failure("ETH")
                .with_move("SOL", 100.0, 90.0),
            config(&["BTC", "ETH", "SOL"]),
        );

        let report = monitor.evaluate_at(t(12, 0)).await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.evaluated, 2);
        assert_eq!(messenger.sent().len(), 2);
        assert_eq!(market.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_short_series_skipped() {
        let (monitor, _market, messenger) = monitor(
            MockMarketData::new()
                .with_samples("PI", vec![PriceSample::new(0, 1.0, 2.0)])
                .with_move("TRX", 0.1, 0.2),
            config(&["PI", "TRX", "CAKE"]),
        );

        let report = monitor.evaluate_at(t(12, 0)).await;

        assert_eq!(report.skipped, 2);
        assert_eq!(report.evaluated, 1);
        assert_eq!(messenger.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_requests_configured_interval_and_count() {
        let (monitor, market, _messenger) =
            monitor(MockMarketData::new(), config(&["ADA"]));

        monitor.evaluate_at(t(12, 0)).await;

        assert_eq!(
            market.calls(),
            vec![MarketCall::Samples(
                Symbol::new("ADA"),
                pricebot_core::CandleInterval::FiveMinutes,
                2
            )]
        );
    }

    #[tokio::test]
    async fn test_send_failure_counted() {
        let market = Arc::new(MockMarketData::new().with_move("BTC", 100.0, 110.0));
        let messenger = Arc::new(MockMessenger::new().failing_sends());
        let monitor = PriceMonitor::new(market, messenger, config(&["BTC"]));

        let report = monitor.evaluate_at(t(12, 0)).await;

        assert_eq!(report.send_failures, 1);
        assert_eq!(report.alerts_sent, 0);
    }

    #[tokio::test]
    async fn test_evaluate_once_uses_clock() {
        let (monitor, _market, messenger) = monitor(
            MockMarketData::new().with_move("BTC", 100.0, 110.0),
            config(&["BTC"]),
        );
        let monitor = monitor.with_clock(Box::new(|| t(3, 0)));

        let report = monitor.evaluate_once().await;

        assert_eq!(report.suppressed, 1);
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_realerts_every_cycle() {
        let (monitor, _market, messenger) = monitor(
            MockMarketData::new().with_move("BTC", 100.0, 110.0),
            config(&["BTC"]),
        );
        let monitor = Arc::new(monitor.with_clock(Box::new(|| t(12, 0))));

        let handle = tokio::spawn(monitor.clone().run());
        tokio::time::sleep(Duration::from_secs(1201)).await;
        handle.abort();

        // Ticks at 0s, 600s and 1200s
        assert_eq!(messenger.sent().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_continues_when_every_symbol_fails() {
        let (monitor, market, messenger) = monitor(
            MockMarketData::new().with_failure("BTC").with_failure("ETH"),
            config(&["BTC", "ETH"]),
        );
        let monitor = Arc::new(monitor.with_clock(Box::new(|| t(12, 0))));

        let handle = tokio::spawn(monitor.clone().run());
        tokio::time::sleep(Duration::from_secs(1201)).await;
        assert!(!handle.is_finished());
        handle.abort();

        // Three cycles, two symbols each
        assert_eq!(market.calls().len(), 6);
        assert!(messenger.sent().is_empty());
    }
}
