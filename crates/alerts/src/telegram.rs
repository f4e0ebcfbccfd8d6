//! Telegram bot handlers.

use crate::CommandResponder;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info};

/// Bot commands.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "📌 Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Check bot status")]
    Status,
    #[command(description = "Price and % change. Usage: /p [coin...] [timeframe]")]
    P(String),
    #[command(description = "Show help")]
    Help,
}

/// Long-polling command listener.
pub struct TelegramBot {
    bot: Bot,
    responder: Arc<CommandResponder>,
}

impl TelegramBot {
    pub fn new(bot: Bot, responder: Arc<CommandResponder>) -> Self {
        Self { bot, responder }
    }

    /// Run the bot command handler until Ctrl+C.
    ///
    /// Handler errors are logged and never stop the dispatcher.
    pub async fn run(self: Arc<Self>) {
        let bot = self.bot.clone();
        let handler = Update::filter_message().filter_command::<Command>().endpoint(
            move |msg: Message, cmd: Command| {
                let this = Arc::clone(&self);
                async move {
                    info!(chat_id = msg.chat.id.0, command = ?cmd, "Command received");
                    if let Err(e) = this.responder.handle(msg.chat.id, msg.id, cmd).await {
                        error!(chat_id = msg.chat.id.0, error = %e, "Failed to handle command");
                    }
                    respond(())
                }
            },
        );

        Dispatcher::builder(bot, handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}
