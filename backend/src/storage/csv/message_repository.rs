//! # CSV Message Repository
//!
//! Free-text notes left for the calendar's author, stored in `messages.csv`:
//!
//! ```csv
//! timestamp,message
//! 2025-12-04T19:30:00Z,"Loved today's riddle, thank you!"
//! ```

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use super::connection::{CsvConnection, MESSAGES_FILE};
use crate::domain::models::Message;
use crate::storage::MessageStorage;

const HEADER: &[&str] = &["timestamp", "message"];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageRow {
    timestamp: DateTime<Utc>,
    message: String,
}

#[derive(Clone)]
pub struct MessageRepository {
    connection: CsvConnection,
}

impl MessageRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

impl MessageStorage for MessageRepository {
    fn append_message(&self, message: &Message) -> Result<()> {
        let _guard = self.connection.write_guard()?;
        let row = MessageRow {
            timestamp: message.timestamp,
            message: message.message.clone(),
        };
        self.connection.append_row(MESSAGES_FILE, HEADER, &row)?;
        info!("Stored message ({} chars)", message.message.chars().count());
        Ok(())
    }

    fn list_messages(&self) -> Result<Vec<Message>> {
        let rows: Vec<MessageRow> = self.connection.read_rows(MESSAGES_FILE, HEADER)?;
        Ok(rows
            .into_iter()
            .map(|row| Message {
                timestamp: row.timestamp,
                message: row.message,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use chrono::TimeZone;

    #[test]
    fn test_messages_keep_commas_and_newlines() {
        let env = TestEnvironment::new().unwrap();
        let repo = MessageRepository::new(env.connection.clone());

        let first = Message {
            timestamp: Utc.with_ymd_and_hms(2025, 12, 4, 19, 30, 0).unwrap(),
            message: "Loved it, thanks!".to_string(),
        };
        let second = Message {
            timestamp: Utc.with_ymd_and_hms(2025, 12, 5, 8, 0, 0).unwrap(),
            message: "Line one\nLine two".to_string(),
        };
        repo.append_message(&first).unwrap();
        repo.append_message(&second).unwrap();

        let reopened = MessageRepository::new(CsvConnection::new(env.base_directory()).unwrap());
        assert_eq!(reopened.list_messages().unwrap(), vec![first, second]);
    }
}
