//! # CSV Calendar Day Repository
//!
//! Stores one row per calendar date in `calendar_days.csv`:
//!
//! ```csv
//! day,stars,puzzle_answer
//! 2025-12-01,2,ember
//! 2025-12-02,1,
//! ```
//!
//! Writes rewrite the whole file through a temp file so that a crash never
//! leaves a half-written calendar behind. A row that fails to parse blocks
//! writes until it is fixed by hand.

use anyhow::Result;
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use super::connection::{CsvConnection, CALENDAR_DAYS_FILE};
use crate::domain::models::DayRecord;
use crate::storage::DayStorage;

const HEADER: &[&str] = &["day", "stars", "puzzle_answer"];

/// CSV record structure for calendar days
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DayRow {
    day: NaiveDate,
    stars: i64,
    puzzle_answer: Option<String>,
}

impl From<&DayRecord> for DayRow {
    fn from(record: &DayRecord) -> Self {
        DayRow {
            day: record.day,
            stars: i64::from(record.stars),
            puzzle_answer: record.puzzle_answer.clone(),
        }
    }
}

impl From<DayRow> for DayRecord {
    fn from(row: DayRow) -> Self {
        // Hand-edited files may hold out-of-range counts.
        let stars = row.stars.clamp(0, i64::from(DayRecord::MAX_STARS)) as u8;
        DayRecord {
            day: row.day,
            stars,
            puzzle_answer: row.puzzle_answer.filter(|answer| !answer.is_empty()),
        }
    }
}

#[derive(Clone)]
pub struct CalendarDayRepository {
    connection: CsvConnection,
}

impl CalendarDayRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_days(&self) -> Result<Vec<DayRecord>> {
        let rows: Vec<DayRow> = self.connection.read_rows(CALENDAR_DAYS_FILE, HEADER)?;
        Ok(rows.into_iter().map(DayRecord::from).collect())
    }
}

impl DayStorage for CalendarDayRepository {
    fn fetch_day(&self, day: NaiveDate) -> Result<Option<DayRecord>> {
        Ok(self.read_days()?.into_iter().find(|record| record.day == day))
    }

    fn write_day(&self, record: &DayRecord) -> Result<DayRecord> {
        let _guard = self.connection.write_guard()?;
        let stored = record.with_stars(record.stars);

        let rows: Vec<DayRow> = self.connection.read_rows_strict(CALENDAR_DAYS_FILE, HEADER)?;
        let mut days: Vec<DayRecord> = rows.into_iter().map(DayRecord::from).collect();
        match days.iter_mut().find(|existing| existing.day == stored.day) {
            Some(existing) => *existing = stored.clone(),
            None => days.push(stored.clone()),
        }
        days.sort_by_key(|entry| entry.day);

        let rows: Vec<DayRow> = days.iter().map(DayRow::from).collect();
        self.connection.write_rows(CALENDAR_DAYS_FILE, HEADER, &rows)?;

        info!("Stored day {} with {} stars", stored.day, stored.stars);
        Ok(stored)
    }

    fn all_days(&self) -> Result<Vec<DayRecord>> {
        let mut days = self.read_days()?;
        days.sort_by_key(|entry| entry.day);
        Ok(days)
    }
}
