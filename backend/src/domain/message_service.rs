use log::info;
use std::sync::Arc;

use super::clock::Clock;
use super::errors::{AdventError, AdventResult};
use super::models::Message;
use crate::storage::AdventStore;

/// Free-text notes left from the calendar page.
#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn AdventStore>,
    clock: Arc<dyn Clock>,
}

impl MessageService {
    pub fn new(store: Arc<dyn AdventStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Store a trimmed message. Blank input is rejected.
    pub fn submit(&self, content: &str) -> AdventResult<Message> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(AdventError::EmptyMessage);
        }

        let message = Message {
            timestamp: self.clock.now(),
            message: trimmed.to_string(),
        };
        self.store
            .append_message(&message)
            .map_err(AdventError::MessageSubmission)?;

        info!("Message submitted at {}", message.timestamp);
        Ok(message)
    }

    pub fn list(&self) -> AdventResult<Vec<Message>> {
        Ok(self.store.list_messages()?)
    }
}
