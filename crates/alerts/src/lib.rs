//! Telegram messaging and command handling for the price alert bot.
//!
//! This crate provides:
//! - A `Messenger` abstraction over send/reply/delete
//! - The teloxide-backed bot and its command set
//! - The command responder with deferred message cleanup
//! - Message formatting shared with the movement monitor

pub mod config;
pub mod error;
pub mod format;
pub mod messenger;
pub mod mock;
pub mod responder;
pub mod telegram;

pub use config::ResponderConfig;
pub use error::AlertError;
pub use messenger::{Messenger, TelegramMessenger};
pub use mock::{MockMessenger, SentMessage};
pub use responder::{parse_price_args, CommandResponder, PriceQuery};
pub use telegram::{Command, TelegramBot};
pub use teloxide::types::{ChatId, MessageId};
