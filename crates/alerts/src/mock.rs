//! Recording messenger for testing.

use crate::{AlertError, Messenger};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;
use teloxide::types::{ChatId, MessageId};

/// A message accepted by [`MockMessenger`].
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub id: MessageId,
    pub reply_to: Option<MessageId>,
    pub text: String,
}

/// In-memory [`Messenger`] that records every operation.
pub struct MockMessenger {
    next_id: AtomicI32,
    sent: Mutex<Vec<SentMessage>>,
    deleted: Mutex<Vec<(ChatId, MessageId)>>,
    /// Should sends and replies fail.
    pub fail_sends: AtomicBool,
    /// Should deletions fail.
    pub fail_deletes: AtomicBool,
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self {
            next_id: AtomicI32::new(1000),
            sent: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            fail_sends: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_deletes(self) -> Self {
        self.fail_deletes.store(true, Ordering::Relaxed);
        self
    }

    pub fn failing_sends(self) -> Self {
        self.fail_sends.store(true, Ordering::Relaxed);
        self
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn deleted(&self) -> Vec<(ChatId, MessageId)> {
        self.deleted.lock().map(|d| d.clone()).unwrap_or_default()
    }

    fn push(&self, chat_id: ChatId, reply_to: Option<MessageId>, text: &str) -> Result<MessageId, AlertError> {
        if self.fail_sends.load(Ordering::Relaxed) {
            return Err(AlertError::Unavailable("mock send failure".to_string()));
        }
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentMessage {
                chat_id,
                id,
                reply_to,
                text: text.to_string(),
            });
        }
        Ok(id)
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<MessageId, AlertError> {
        self.push(chat_id, None, text)
    }

    async fn reply_to(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
    ) -> Result<MessageId, AlertError> {
        self.push(chat_id, Some(message_id), text)
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), AlertError> {
        if self.fail_deletes.load(Ordering::Relaxed) {
            return Err(AlertError::Unavailable("mock delete failure".to_string()));
        }
        if let Ok(mut deleted) = self.deleted.lock() {
            deleted.push((chat_id, message_id));
        }
        Ok(())
    }
}
