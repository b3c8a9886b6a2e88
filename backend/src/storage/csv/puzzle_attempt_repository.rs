//! # CSV Puzzle Attempt Repository
//!
//! Append-only log of riddle answers in `puzzle_attempts.csv`:
//!
//! ```csv
//! day,attempted_at,answer,correct
//! 2025-12-03,2025-12-03T08:12:00Z,coal,false
//! 2025-12-03,2025-12-03T08:13:10Z,ember,true
//! ```

use anyhow::Result;
use chrono::NaiveDate;
use log::debug;

use super::connection::{CsvConnection, PUZZLE_ATTEMPTS_FILE};
use crate::domain::models::PuzzleAttempt;
use crate::storage::PuzzleAttemptStorage;

const HEADER: &[&str] = &["day", "attempted_at", "answer", "correct"];

#[derive(Clone)]
pub struct PuzzleAttemptRepository {
    connection: CsvConnection,
}

impl PuzzleAttemptRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

impl PuzzleAttemptStorage for PuzzleAttemptRepository {
    fn record_puzzle_attempt(&self, attempt: &PuzzleAttempt) -> Result<()> {
        let _guard = self.connection.write_guard()?;
        self.connection.append_row(PUZZLE_ATTEMPTS_FILE, HEADER, attempt)?;
        debug!("Recorded puzzle attempt for {} (correct: {})", attempt.day, attempt.correct);
        Ok(())
    }

    fn puzzle_attempts(&self, day: NaiveDate) -> Result<Vec<PuzzleAttempt>> {
        let attempts: Vec<PuzzleAttempt> = self.connection.read_rows(PUZZLE_ATTEMPTS_FILE, HEADER)?;
        Ok(attempts.into_iter().filter(|attempt| attempt.day == day).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_attempts_are_filtered_by_day() {
        let env = TestEnvironment::new().unwrap();
        let repo = PuzzleAttemptRepository::new(env.connection.clone());
        let day3 = NaiveDate::from_ymd_opt(2025, 12, 3).unwrap();
        let day4 = NaiveDate::from_ymd_opt(2025, 12, 4).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 12, 3, 8, 0, 0).unwrap();

        repo.record_puzzle_attempt(&PuzzleAttempt::new(day3, at, " coal ", false)).unwrap();
        repo.record_puzzle_attempt(&PuzzleAttempt::new(day3, at, "ember", true)).unwrap();
        repo.record_puzzle_attempt(&PuzzleAttempt::new(day4, at, "snow", true)).unwrap();

        let attempts = repo.puzzle_attempts(day3).unwrap();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].answer, "coal");
        assert!(!attempts[0].correct);
        assert!(attempts[1].correct);
        assert_eq!(repo.puzzle_attempts(day4).unwrap().len(), 1);
    }
}
