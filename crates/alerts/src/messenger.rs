//! Outbound chat operations.

use crate::AlertError;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ReplyParameters};

/// Send, reply and delete against the chat platform.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send `text` to `chat_id`, returning the new message id.
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<MessageId, AlertError>;

    /// Send `text` as a reply to `message_id`.
    async fn reply_to(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<MessageId, AlertError>;

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), AlertError>;
}

/// [`Messenger`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<MessageId, AlertError> {
        let sent = self.bot.send_message(chat_id, text).await?;
        Ok(sent.id)
    }

    async fn reply_to(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<MessageId, AlertError> {
        let sent = self
            .bot
            .send_message(chat_id, text)
            .reply_parameters(ReplyParameters::new(message_id))
            .await?;
        Ok(sent.id)
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), AlertError> {
        self.bot.delete_message(chat_id, message_id).await?;
        Ok(())
    }
}
