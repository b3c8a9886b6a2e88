use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::CheckInStage;

/// Progress for one calendar date.
///
/// `stars` is a bounded counter: 0 = not checked in, 1 = checked in,
/// 2 = riddle solved. Two stars always imply the check-in happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: NaiveDate,
    pub stars: u8,
    /// Expected riddle answer stored alongside the day, if any
    pub puzzle_answer: Option<String>,
}

impl DayRecord {
    pub const MAX_STARS: u8 = 2;

    /// A fresh, not yet checked-in day
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            stars: 0,
            puzzle_answer: None,
        }
    }

    /// Copy of this record with a different star count, clamped to the valid range.
    pub fn with_stars(&self, stars: u8) -> Self {
        Self {
            day: self.day,
            stars: stars.min(Self::MAX_STARS),
            puzzle_answer: self.puzzle_answer.clone(),
        }
    }

    pub fn stage(&self) -> CheckInStage {
        CheckInStage::from_stars(self.stars)
    }

    pub fn part1_completed(&self) -> bool {
        self.stars > 0
    }

    pub fn part2_completed(&self) -> bool {
        self.stars >= Self::MAX_STARS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
    }

    #[test]
    fn test_new_day_starts_at_part1() {
        let record = DayRecord::new(day());
        assert_eq!(record.stars, 0);
        assert_eq!(record.stage(), CheckInStage::Part1);
        assert!(!record.part1_completed());
    }

    #[test]
    fn test_with_stars_clamps_and_keeps_answer() {
        let mut record = DayRecord::new(day());
        record.puzzle_answer = Some("ember".to_string());

        let bumped = record.with_stars(9);
        assert_eq!(bumped.stars, 2);
        assert_eq!(bumped.puzzle_answer.as_deref(), Some("ember"));
        assert!(bumped.part1_completed());
        assert!(bumped.part2_completed());
    }
}
