//! Command handling: static replies and the `/p` price lookup.

use crate::format::{
    format_dominance_line, format_dominance_unavailable, format_ticker_line,
    format_ticker_unavailable,
};
use crate::{AlertError, Command, Messenger, ResponderConfig};
use pricebot_core::Symbol;
use pricebot_feeds::MarketData;
use std::sync::Arc;
use std::time::Duration;
use teloxide::types::{ChatId, MessageId};
use teloxide::utils::command::BotCommands;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const START_TEXT: &str = "🤖 Crypto bot started! Type /help to see the command list.";
pub const STATUS_TEXT: &str = "✅ Bot is running normally!";
pub const PRICE_USAGE: &str = "⚠️ Please use the correct format: /p [coin1] [coin2] ... [timeframe]";
const PRICE_EXAMPLE: &str =
    "Example: /p BTC ETH dom 15m (BTC and ETH prices plus BTC Dominance, 15m timeframe)";

/// Parsed arguments of `/p`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuery {
    pub symbols: Vec<Symbol>,
    /// Display only; never changes what is queried
    pub timeframe: String,
}

/// Parse `/p` arguments.
///
/// With more than one token the last one is the timeframe label, otherwise
/// `default_timeframe` applies. `None` when no symbol is given.
pub fn parse_price_args(args: &str, default_timeframe: &str) -> Option<PriceQuery> {
    let tokens: Vec<&str> = args.split_whitespace().collect();
    match tokens.as_slice() {
        [] => None,
        [symbol] => Some(PriceQuery {
            symbols: vec![Symbol::new(symbol)],
            timeframe: default_timeframe.to_string(),
        }),
        [symbols @ .., timeframe] => Some(PriceQuery {
            symbols: symbols.iter().map(|s| Symbol::new(s)).collect(),
            timeframe: (*timeframe).to_string(),
        }),
    }
}

/// Answers bot commands using market data and the messenger.
pub struct CommandResponder {
    market: Arc<dyn MarketData>,
    messenger: Arc<dyn Messenger>,
    config: ResponderConfig,
}

impl CommandResponder {
    pub fn new(
        market: Arc<dyn MarketData>,
        messenger: Arc<dyn Messenger>,
        config: ResponderConfig,
    ) -> Self {
        Self {
            market,
            messenger,
            config,
        }
    }

    /// Handle one command received as `message_id` in `chat_id`.
    pub async fn handle(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        command: Command,
    ) -> Result<(), AlertError> {
        match command {
            Command::Help => {
                self.messenger.send_message(chat_id, &help_text()).await?;
            }
            Command::Start => {
                self.messenger.send_message(chat_id, START_TEXT).await?;
            }
            Command::Status => {
                self.messenger.send_message(chat_id, STATUS_TEXT).await?;
            }
            Command::P(args) => {
                self.respond_price(chat_id, message_id, &args).await?;
            }
        }
        Ok(())
    }

    /// Reply to a `/p` command and schedule cleanup of both messages.
    ///
    /// Returns the cleanup task handle, or `None` when only the usage hint
    /// was sent.
    pub async fn respond_price(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        args: &str,
    ) -> Result<Option<JoinHandle<()>>, AlertError> {
        let Some(query) = parse_price_args(args, &self.config.default_timeframe) else {
            debug!(chat_id = chat_id.0, "Price command without symbols");
            self.messenger.reply_to(chat_id, message_id, PRICE_USAGE).await?;
            return Ok(None);
        };

        let text = self.price_reply(&query).await;
        let reply_id = self.messenger.reply_to(chat_id, message_id, &text).await?;
        info!(
            chat_id = chat_id.0,
            symbols = query.symbols.len(),
            timeframe = %query.timeframe,
            "Price reply sent"
        );

        Ok(Some(schedule_deletion(
            Arc::clone(&self.messenger),
            chat_id,
            vec![reply_id, message_id],
            self.config.cleanup_delay,
        )))
    }

    /// One line per requested symbol.
    pub async fn price_reply(&self, query: &PriceQuery) -> String {
        let mut lines = Vec::with_capacity(query.symbols.len());

        for symbol in &query.symbols {
            let line = if self.config.is_dominance_alias(symbol) {
                match self.market.get_dominance_metric().await {
                    Some(dominance) => format_dominance_line(dominance, &query.timeframe),
                    None => format_dominance_unavailable(),
                }
            } else {
                match self.market.get_ticker_snapshot(symbol).await {
                    Some(snapshot) => format_ticker_line(
                        symbol,
                        &snapshot,
                        self.config.price_decimals,
                        &self.config.quote_asset,
                    ),
                    None => format_ticker_unavailable(symbol),
                }
            };
            lines.push(line);
        }

        lines.join("\n")
    }
}

/// Full `/help` text.
pub fn help_text() -> String {
    format!("{}\n\n{}", Command::descriptions(), PRICE_EXAMPLE)
}

/// Delete `message_ids` after `delay` on a background task.
///
/// Each deletion is attempted independently; failures are only logged.
pub fn schedule_deletion(
    messenger: Arc<dyn Messenger>,
    chat_id: ChatId,
    message_ids: Vec<MessageId>,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        for message_id in message_ids {
            if let Err(e) = messenger.delete_message(chat_id, message_id).await {
                warn!(
                    chat_id = chat_id.0,
                    message_id = message_id.0,
                    error = %e,
                    "Failed to delete message"
                );
            }
        }
    })
}
