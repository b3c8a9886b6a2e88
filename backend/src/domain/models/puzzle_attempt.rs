use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One submitted answer to a day's riddle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleAttempt {
    pub day: NaiveDate,
    pub attempted_at: DateTime<Utc>,
    /// The attempt as typed, trimmed
    pub answer: String,
    pub correct: bool,
}

impl PuzzleAttempt {
    pub fn new(day: NaiveDate, attempted_at: DateTime<Utc>, answer: &str, correct: bool) -> Self {
        Self {
            day,
            attempted_at,
            answer: answer.trim().to_string(),
            correct,
        }
    }
}
