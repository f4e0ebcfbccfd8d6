//! Price Bot - Headless Server
//!
//! Watches a list of crypto pairs for sharp moves, posts alerts to a Telegram
//! chat and answers price commands.

mod config;
mod liveness;

use clap::Parser;
use config::{AppConfig, ConfigError, TelegramSecrets};
use std::sync::Arc;
use teloxide::Bot;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pricebot_alerts::{CommandResponder, Messenger, TelegramBot, TelegramMessenger};
use pricebot_engine::PriceMonitor;
use pricebot_feeds::{FeedError, MarketData, RestMarketData};

/// Price Bot CLI
#[derive(Parser, Debug)]
#[command(name = "pricebot")]
#[command(about = "Crypto price movement alerts for Telegram", long_about = None)]
struct Args {
    /// Optional JSON settings file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Liveness endpoint host (overrides the settings file)
    #[arg(long)]
    host: Option<String>,

    /// Liveness endpoint port (overrides the settings file)
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to build market data client: {0}")]
    Feed(#[from] FeedError),
    #[error("Failed to start liveness endpoint: {0}")]
    Liveness(#[from] std::io::Error),
}

/// RUST_LOG wins over `--log-level` when set.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_logging(level: &str) {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(build_filter(level))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(host) = &args.host {
        config.liveness.host = host.clone();
    }
    if let Some(port) = args.port {
        config.liveness.port = port;
    }
}

async fn run(args: Args) -> Result<(), StartupError> {
    let secrets = TelegramSecrets::from_env()?;
    let mut config = AppConfig::load(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    let monitor_config = config.monitor_config(secrets.chat_id)?;
    let rest_config = config.rest_config()?;

    info!("🚀 Price Bot starting...");
    info!("  Watchlist: {} symbols", monitor_config.watchlist.len());
    info!("  Candles: {}", monitor_config.interval);
    info!("  Threshold: {}%", monitor_config.threshold_pct);
    info!("  Alert Window: {} (UTC{})", monitor_config.window, monitor_config.utc_offset);
    info!("  Poll Interval: {}s", monitor_config.poll_interval.as_secs());
    info!("  Chat: {}", secrets.chat_id.0);

    let market: Arc<dyn MarketData> = Arc::new(RestMarketData::new(rest_config)?);
    let bot = Bot::new(&secrets.bot_token);
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(bot.clone()));

    let responder = Arc::new(CommandResponder::new(
        Arc::clone(&market),
        Arc::clone(&messenger),
        config.responder_config(),
    ));

    let (_, liveness_handle) = liveness::start_liveness_server(&config.liveness_addr()).await?;

    let monitor = Arc::new(PriceMonitor::new(market, messenger, monitor_config));
    let monitor_handle = tokio::spawn(monitor.run());

    info!("Listening for commands");
    Arc::new(TelegramBot::new(bot, responder)).run().await;

    info!("Shutting down...");
    monitor_handle.abort();
    liveness_handle.abort();
    info!("👋 Price Bot stopped");

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(&args.log_level);

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
