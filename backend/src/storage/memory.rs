//! # In-Memory Storage
//!
//! A process-local [`AdventStore`](super::AdventStore) backed by a single
//! mutex-guarded state. Every operation takes the lock once, so the atomic
//! guards in the storage contract hold trivially.

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use super::traits::{DayStorage, MessageStorage, PromptContent, PromptStorage, PuzzleAttemptStorage, VoucherStorage};
use crate::domain::models::{DayRecord, Message, PuzzleAttempt, VoucherDraft, VoucherOption, VoucherRecord};

#[derive(Debug, Default)]
struct MemoryState {
    days: BTreeMap<NaiveDate, DayRecord>,
    vouchers: Vec<VoucherRecord>,
    voucher_options: Vec<VoucherOption>,
    prompts: HashMap<NaiveDate, PromptContent>,
    messages: Vec<Message>,
    puzzle_attempts: Vec<PuzzleAttempt>,
}

#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store with the single-entry default catalog
    pub fn new() -> Self {
        let state = MemoryState {
            voucher_options: VoucherOption::default_catalog(),
            ..MemoryState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn with_voucher_options(mut self, options: Vec<VoucherOption>) -> Self {
        if let Ok(state) = self.state.get_mut() {
            state.voucher_options = options;
        }
        self
    }

    pub fn with_prompt(mut self, day: NaiveDate, content: PromptContent) -> Self {
        if let Ok(state) = self.state.get_mut() {
            state.prompts.insert(day, content);
        }
        self
    }

    pub fn with_day(mut self, record: DayRecord) -> Self {
        if let Ok(state) = self.state.get_mut() {
            state.days.insert(record.day, record);
        }
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| anyhow!("In-memory advent store lock poisoned"))
    }
}

impl DayStorage for MemoryStore {
    fn fetch_day(&self, day: NaiveDate) -> Result<Option<DayRecord>> {
        Ok(self.lock()?.days.get(&day).cloned())
    }

    fn write_day(&self, record: &DayRecord) -> Result<DayRecord> {
        let stored = record.with_stars(record.stars);
        self.lock()?.days.insert(stored.day, stored.clone());
        debug!("Wrote day {} with {} stars", stored.day, stored.stars);
        Ok(stored)
    }

    fn all_days(&self) -> Result<Vec<DayRecord>> {
        Ok(self.lock()?.days.values().cloned().collect())
    }
}

impl VoucherStorage for MemoryStore {
    fn append_voucher(&self, draft: &VoucherDraft) -> Result<VoucherRecord> {
        let mut state = self.lock()?;
        let record = VoucherRecord::from_draft(VoucherRecord::next_sequence(&state.vouchers), draft);
        state.vouchers.push(record.clone());
        Ok(record)
    }

    fn append_voucher_within(&self, draft: &VoucherDraft, max_vouchers: usize) -> Result<Option<VoucherRecord>> {
        let mut state = self.lock()?;
        if state.vouchers.len() >= max_vouchers {
            debug!("Voucher limit {} reached, not appending", max_vouchers);
            return Ok(None);
        }
        let record = VoucherRecord::from_draft(VoucherRecord::next_sequence(&state.vouchers), draft);
        state.vouchers.push(record.clone());
        Ok(Some(record))
    }

    fn update_voucher(&self, id: &str, redeemed_at: DateTime<Utc>) -> Result<Option<VoucherRecord>> {
        let mut state = self.lock()?;
        let entry = match state.vouchers.iter_mut().find(|voucher| voucher.id == id) {
            Some(entry) => entry,
            None => return Ok(None),
        };
        if entry.redeemed_at.is_none() {
            entry.redeemed_at = Some(redeemed_at);
        }
        Ok(Some(entry.clone()))
    }

    fn all_vouchers(&self) -> Result<Vec<VoucherRecord>> {
        Ok(self.lock()?.vouchers.clone())
    }

    fn find_voucher(&self, id: &str) -> Result<Option<VoucherRecord>> {
        Ok(self.lock()?.vouchers.iter().find(|voucher| voucher.id == id).cloned())
    }

    fn voucher_options(&self) -> Result<Vec<VoucherOption>> {
        Ok(self.lock()?.voucher_options.clone())
    }
}

impl PromptStorage for MemoryStore {
    fn prompt_for(&self, day: NaiveDate) -> Result<Option<PromptContent>> {
        Ok(self.lock()?.prompts.get(&day).cloned())
    }
}

impl MessageStorage for MemoryStore {
    fn append_message(&self, message: &Message) -> Result<()> {
        self.lock()?.messages.push(message.clone());
        Ok(())
    }

    fn list_messages(&self) -> Result<Vec<Message>> {
        Ok(self.lock()?.messages.clone())
    }
}

impl PuzzleAttemptStorage for MemoryStore {
    fn record_puzzle_attempt(&self, attempt: &PuzzleAttempt) -> Result<()> {
        self.lock()?.puzzle_attempts.push(attempt.clone());
        Ok(())
    }

    fn puzzle_attempts(&self, day: NaiveDate) -> Result<Vec<PuzzleAttempt>> {
        Ok(self
            .lock()?
            .puzzle_attempts
            .iter()
            .filter(|attempt| attempt.day == day)
            .cloned()
            .collect())
    }
}
