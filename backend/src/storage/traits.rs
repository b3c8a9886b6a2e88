//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! Each entity gets its own trait; [`AdventStore`] is the union the domain
//! services depend on. Operations are synchronous and may sit on slow
//! media. No call is transactional with any other, except where a method
//! documents an atomic guard.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

use crate::domain::models::{DayRecord, Message, PuzzleAttempt, VoucherDraft, VoucherOption, VoucherRecord};

/// Free-form content authored for one day (prompt lines, riddle, answer)
pub type PromptContent = HashMap<String, String>;

/// Trait defining the interface for calendar day storage operations
pub trait DayStorage: Send + Sync {
    /// Retrieve the record for a day, if one was ever written
    fn fetch_day(&self, day: NaiveDate) -> Result<Option<DayRecord>>;

    /// Upsert by day. Overwrites the full record, so callers must
    /// read-modify-write rather than patch a subset of fields.
    fn write_day(&self, record: &DayRecord) -> Result<DayRecord>;

    /// All day records, ordered by day
    fn all_days(&self) -> Result<Vec<DayRecord>>;
}

/// Trait defining the interface for voucher storage operations
pub trait VoucherStorage: Send + Sync {
    /// Append a voucher, assigning the next `voucher-NNNN` id (append-only)
    fn append_voucher(&self, draft: &VoucherDraft) -> Result<VoucherRecord>;

    /// Append a voucher only while fewer than `max_vouchers` are stored.
    ///
    /// The count check and the append happen atomically with respect to
    /// other calls on the same store. Returns `None` when the limit is
    /// already reached.
    fn append_voucher_within(&self, draft: &VoucherDraft, max_vouchers: usize) -> Result<Option<VoucherRecord>>;

    /// Mark a voucher redeemed. Returns `None` for an unknown id.
    ///
    /// An already redeemed voucher is returned unchanged; `redeemed_at` is
    /// never overwritten.
    fn update_voucher(&self, id: &str, redeemed_at: DateTime<Utc>) -> Result<Option<VoucherRecord>>;

    /// All awarded vouchers in award order
    fn all_vouchers(&self) -> Result<Vec<VoucherRecord>>;

    /// Retrieve a specific voucher by ID
    fn find_voucher(&self, id: &str) -> Result<Option<VoucherRecord>>;

    /// The configured voucher catalog
    fn voucher_options(&self) -> Result<Vec<VoucherOption>>;
}

/// Trait defining the interface for day-keyed prompt content
pub trait PromptStorage: Send + Sync {
    fn prompt_for(&self, day: NaiveDate) -> Result<Option<PromptContent>>;
}

/// Trait defining the interface for free-text message storage
pub trait MessageStorage: Send + Sync {
    fn append_message(&self, message: &Message) -> Result<()>;

    /// Messages in submission order
    fn list_messages(&self) -> Result<Vec<Message>>;
}

/// Trait defining the interface for riddle attempt storage
pub trait PuzzleAttemptStorage: Send + Sync {
    fn record_puzzle_attempt(&self, attempt: &PuzzleAttempt) -> Result<()>;

    /// Attempts for one day, oldest first
    fn puzzle_attempts(&self, day: NaiveDate) -> Result<Vec<PuzzleAttempt>>;
}

/// The full storage contract the advent services are built on.
///
/// Implemented automatically for any backend that implements every
/// per-entity trait.
pub trait AdventStore: DayStorage + VoucherStorage + PromptStorage + MessageStorage + PuzzleAttemptStorage {
    /// Sum of stars across every stored day
    fn total_stars(&self) -> Result<u32> {
        Ok(self.all_days()?.iter().map(|record| u32::from(record.stars)).sum())
    }
}

impl<T> AdventStore for T where T: DayStorage + VoucherStorage + PromptStorage + MessageStorage + PuzzleAttemptStorage {}
