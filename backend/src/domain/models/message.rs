use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-text note left from the calendar page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}
