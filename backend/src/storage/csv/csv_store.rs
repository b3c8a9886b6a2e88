//! File-backed [`AdventStore`](crate::storage::AdventStore) assembled from
//! the per-entity CSV and YAML repositories.
//!
//! All repositories share one [`CsvConnection`], and therefore one write
//! lock, so the voucher guard holds across every handle cloned from the
//! same store.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use std::path::Path;

use super::calendar_day_repository::CalendarDayRepository;
use super::connection::CsvConnection;
use super::message_repository::MessageRepository;
use super::prompt_repository::PromptRepository;
use super::puzzle_attempt_repository::PuzzleAttemptRepository;
use super::voucher_repository::VoucherRepository;
use crate::domain::models::{DayRecord, Message, PuzzleAttempt, VoucherDraft, VoucherOption, VoucherRecord};
use crate::storage::{DayStorage, MessageStorage, PromptContent, PromptStorage, PuzzleAttemptStorage, VoucherStorage};

#[derive(Clone)]
pub struct CsvStore {
    connection: CsvConnection,
    days: CalendarDayRepository,
    vouchers: VoucherRepository,
    prompts: PromptRepository,
    messages: MessageRepository,
    puzzle_attempts: PuzzleAttemptRepository,
}

impl CsvStore {
    /// Open (creating if needed) a data directory
    pub fn open<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let connection = CsvConnection::new(base_directory)?;
        info!("Opened CSV advent store at {}", connection.base_directory().display());
        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: CsvConnection) -> Self {
        Self {
            days: CalendarDayRepository::new(connection.clone()),
            vouchers: VoucherRepository::new(connection.clone()),
            prompts: PromptRepository::new(connection.clone()),
            messages: MessageRepository::new(connection.clone()),
            puzzle_attempts: PuzzleAttemptRepository::new(connection.clone()),
            connection,
        }
    }

    pub fn base_directory(&self) -> &Path {
        self.connection.base_directory()
    }

    /// Replace the voucher catalog on disk
    pub fn store_voucher_options(&self, options: &[VoucherOption]) -> Result<()> {
        self.vouchers.store_voucher_options(options)
    }
}

impl DayStorage for CsvStore {
    fn fetch_day(&self, day: NaiveDate) -> Result<Option<DayRecord>> {
        self.days.fetch_day(day)
    }

    fn write_day(&self, record: &DayRecord) -> Result<DayRecord> {
        self.days.write_day(record)
    }

    fn all_days(&self) -> Result<Vec<DayRecord>> {
        self.days.all_days()
    }
}

impl VoucherStorage for CsvStore {
    fn append_voucher(&self, draft: &VoucherDraft) -> Result<VoucherRecord> {
        self.vouchers.append_voucher(draft)
    }

    fn append_voucher_within(&self, draft: &VoucherDraft, max_vouchers: usize) -> Result<Option<VoucherRecord>> {
        self.vouchers.append_voucher_within(draft, max_vouchers)
    }

    fn update_voucher(&self, id: &str, redeemed_at: DateTime<Utc>) -> Result<Option<VoucherRecord>> {
        self.vouchers.update_voucher(id, redeemed_at)
    }

    fn all_vouchers(&self) -> Result<Vec<VoucherRecord>> {
        self.vouchers.all_vouchers()
    }

    fn find_voucher(&self, id: &str) -> Result<Option<VoucherRecord>> {
        self.vouchers.find_voucher(id)
    }

    fn voucher_options(&self) -> Result<Vec<VoucherOption>> {
        self.vouchers.voucher_options()
    }
}

impl PromptStorage for CsvStore {
    fn prompt_for(&self, day: NaiveDate) -> Result<Option<PromptContent>> {
        self.prompts.prompt_for(day)
    }
}

impl MessageStorage for CsvStore {
    fn append_message(&self, message: &Message) -> Result<()> {
        self.messages.append_message(message)
    }

    fn list_messages(&self) -> Result<Vec<Message>> {
        self.messages.list_messages()
    }
}

impl PuzzleAttemptStorage for CsvStore {
    fn record_puzzle_attempt(&self, attempt: &PuzzleAttempt) -> Result<()> {
        self.puzzle_attempts.record_puzzle_attempt(attempt)
    }

    fn puzzle_attempts(&self, day: NaiveDate) -> Result<Vec<PuzzleAttempt>> {
        self.puzzle_attempts.puzzle_attempts(day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use crate::storage::AdventStore;
    use chrono::TimeZone;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_total_stars_sums_all_days() {
        let env = TestEnvironment::new().unwrap();
        let store = env.store();
        for (d, stars) in [(1, 2), (2, 1), (3, 0)] {
            let day = NaiveDate::from_ymd_opt(2025, 12, d).unwrap();
            store.write_day(&DayRecord::new(day).with_stars(stars)).unwrap();
        }
        assert_eq!(store.total_stars().unwrap(), 3);
    }

    #[test]
    fn test_concurrent_guarded_appends_respect_limit() {
        let env = TestEnvironment::new().unwrap();
        let store = Arc::new(env.store());
        let draft = VoucherDraft {
            title: "Massage".to_string(),
            details: "relax".to_string(),
            awarded_at: Utc.with_ymd_and_hms(2025, 12, 3, 9, 0, 0).unwrap(),
            redeemable_at: None,
        };

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let draft = draft.clone();
                thread::spawn(move || store.append_voucher_within(&draft, 3).unwrap().is_some())
            })
            .collect();
        let awarded = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|appended| *appended)
            .count();

        assert_eq!(awarded, 3);
        assert_eq!(store.all_vouchers().unwrap().len(), 3);
    }
}
