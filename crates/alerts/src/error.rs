//! Error types for messaging operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Telegram API error: {0}")]
    Api(#[from] teloxide::RequestError),
    #[error("Messenger unavailable: {0}")]
    Unavailable(String),
}
