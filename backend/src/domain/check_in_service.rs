//! Check-in service: the per-day three-stage progression.
//!
//! A day moves `Part1 -> Part2 -> Done` as its star counter goes 0, 1, 2.
//! Every transition re-reads the stored record and writes only when the
//! guard holds, so repeated clicks are no-ops rather than errors.
//!
//! `reset_part1` is the one way back and drops the day to zero stars, which
//! also forgets a solved riddle.

use chrono::NaiveDate;
use log::{debug, info, warn};
use shared::{CheckInStage, DayStatus};
use std::sync::Arc;

use super::calendar::CalendarService;
use super::clock::Clock;
use super::errors::AdventResult;
use super::models::{DayRecord, PuzzleAttempt};
use super::prompt_service::PromptService;
use crate::storage::AdventStore;

#[derive(Clone)]
pub struct CheckInService {
    day: NaiveDate,
    store: Arc<dyn AdventStore>,
    clock: Arc<dyn Clock>,
}

impl CheckInService {
    /// Bind to `day`, creating its record with zero stars if none exists yet.
    pub fn for_day(store: Arc<dyn AdventStore>, clock: Arc<dyn Clock>, day: NaiveDate) -> AdventResult<Self> {
        if store.fetch_day(day)?.is_none() {
            store.write_day(&DayRecord::new(day))?;
            debug!("Created day entry for {}", day);
        }
        Ok(Self { day, store, clock })
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Check in: 0 -> 1 star. No-op once checked in.
    pub fn complete_part1(&self) -> AdventResult<DayRecord> {
        let record = self.day_record()?;
        if record.stars != 0 {
            debug!("Day {} already checked in", self.day);
            return Ok(record);
        }
        info!("Checked in for {}", self.day);
        Ok(self.store.write_day(&record.with_stars(1))?)
    }

    /// Undo the check-in: any stars -> 0. No-op when nothing to undo.
    pub fn reset_part1(&self) -> AdventResult<DayRecord> {
        let record = self.day_record()?;
        if record.stars == 0 {
            debug!("Day {} has nothing to reset", self.day);
            return Ok(record);
        }
        if record.part2_completed() {
            info!("Resetting {} also clears its solved riddle", self.day);
        } else {
            info!("Reset check-in for {}", self.day);
        }
        Ok(self.store.write_day(&record.with_stars(0))?)
    }

    /// Solve the riddle: 1 -> 2 stars. Requires a prior check-in.
    pub fn complete_part2(&self) -> AdventResult<DayRecord> {
        let record = self.day_record()?;
        if record.stars != 1 {
            debug!("Day {} at {} stars, riddle completion skipped", self.day, record.stars);
            return Ok(record);
        }
        info!("Riddle solved for {}", self.day);
        Ok(self.store.write_day(&record.with_stars(2))?)
    }

    /// Submit a riddle answer. Returns whether it matched.
    ///
    /// A wrong answer leaves the day untouched. Every attempt is logged;
    /// a failure to log it does not change the outcome.
    pub fn attempt_part2(&self, prompt: &PromptService, answer: &str) -> AdventResult<bool> {
        let correct = prompt.matches(answer)?;

        let attempt = PuzzleAttempt::new(self.day, self.clock.now(), answer, correct);
        if let Err(e) = self.store.record_puzzle_attempt(&attempt) {
            warn!("Failed to record puzzle attempt for {}: {}", self.day, e);
        }

        if correct {
            self.complete_part2()?;
        } else {
            debug!("Wrong riddle answer for {}", self.day);
        }
        Ok(correct)
    }

    pub fn current_stage(&self) -> AdventResult<CheckInStage> {
        Ok(self.day_record()?.stage())
    }

    pub fn stars(&self) -> AdventResult<u8> {
        Ok(self.day_record()?.stars)
    }

    pub fn total_stars(&self) -> AdventResult<u32> {
        Ok(self.store.total_stars()?)
    }

    /// Days with at least one star
    pub fn total_check_ins(&self) -> AdventResult<u32> {
        let days = self.store.all_days()?;
        Ok(days.iter().filter(|record| record.part1_completed()).count() as u32)
    }

    pub fn puzzle_attempts(&self) -> AdventResult<Vec<PuzzleAttempt>> {
        Ok(self.store.puzzle_attempts(self.day)?)
    }

    pub fn status(&self, calendar: &CalendarService) -> AdventResult<DayStatus> {
        let record = self.day_record()?;
        Ok(DayStatus {
            day: self.day.format("%Y-%m-%d").to_string(),
            stars: record.stars,
            stage: record.stage(),
            total_stars: self.total_stars()?,
            total_check_ins: self.total_check_ins()?,
            days_left: calendar.days_left(self.day),
        })
    }

    /// Fresh read of the day, falling back to an empty record
    fn day_record(&self) -> AdventResult<DayRecord> {
        Ok(self
            .store
            .fetch_day(self.day)?
            .unwrap_or_else(|| DayRecord::new(self.day)))
    }
}
