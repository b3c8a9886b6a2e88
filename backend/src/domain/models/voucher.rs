//! Voucher catalog entries and awarded vouchers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::VoucherSummary;

/// A prize the lottery can hand out.
///
/// `chance` is an integer weight; every pool used for a single draw must
/// have weights summing to exactly 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherOption {
    pub title: String,
    pub details: String,
    pub chance: u32,
    /// Awarded vouchers stay locked until this date
    #[serde(default)]
    pub redeemable_at: Option<NaiveDate>,
}

impl VoucherOption {
    pub fn new(title: &str, details: &str, chance: u32) -> Self {
        Self {
            title: title.to_string(),
            details: details.to_string(),
            chance,
            redeemable_at: None,
        }
    }

    /// Catalog used when nothing else is configured
    pub fn default_catalog() -> Vec<VoucherOption> {
        vec![VoucherOption::new("Surprise Treat", "Redeemable for one delightful surprise", 100)]
    }

    pub fn redeemable_from(mut self, date: NaiveDate) -> Self {
        self.redeemable_at = Some(date);
        self
    }
}

/// Everything needed to append a voucher except its id, which the store assigns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherDraft {
    pub title: String,
    pub details: String,
    pub awarded_at: DateTime<Utc>,
    pub redeemable_at: Option<NaiveDate>,
}

impl VoucherDraft {
    pub fn from_option(option: &VoucherOption, awarded_at: DateTime<Utc>) -> Self {
        Self {
            title: option.title.clone(),
            details: option.details.clone(),
            awarded_at,
            redeemable_at: option.redeemable_at,
        }
    }
}

/// An awarded voucher.
///
/// Immutable apart from the one-time transition to redeemed; `redeemed_at`
/// is never cleared once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherRecord {
    pub id: String,
    pub title: String,
    pub details: String,
    pub awarded_at: DateTime<Utc>,
    pub redeemable_at: Option<NaiveDate>,
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl VoucherRecord {
    pub const ID_PREFIX: &'static str = "voucher-";

    /// Build the record for the given sequence number
    pub fn from_draft(sequence: u32, draft: &VoucherDraft) -> Self {
        Self {
            id: Self::format_id(sequence),
            title: draft.title.clone(),
            details: draft.details.clone(),
            awarded_at: draft.awarded_at,
            redeemable_at: draft.redeemable_at,
            redeemed_at: None,
        }
    }

    pub fn format_id(sequence: u32) -> String {
        format!("{}{:04}", Self::ID_PREFIX, sequence)
    }

    /// Sequence number embedded in a `voucher-NNNN` id
    pub fn sequence_of(id: &str) -> Option<u32> {
        id.trim().strip_prefix(Self::ID_PREFIX)?.parse().ok()
    }

    /// Accept either a full id or a bare sequence number such as `"7"`.
    pub fn normalize_id(raw: &str) -> String {
        let trimmed = raw.trim();
        match trimmed.parse::<u32>() {
            Ok(sequence) => Self::format_id(sequence),
            Err(_) => trimmed.to_string(),
        }
    }

    /// Next free sequence number given the vouchers already stored
    pub fn next_sequence(existing: &[VoucherRecord]) -> u32 {
        existing
            .iter()
            .filter_map(|record| Self::sequence_of(&record.id))
            .max()
            .unwrap_or(0)
            + 1
    }

    pub fn is_redeemed(&self) -> bool {
        self.redeemed_at.is_some()
    }

    /// A voucher without a lock date is always redeemable.
    pub fn is_redeemable(&self, today: NaiveDate) -> bool {
        match self.redeemable_at {
            Some(date) => date <= today,
            None => true,
        }
    }

    pub fn to_summary(&self, today: NaiveDate) -> VoucherSummary {
        VoucherSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            details: self.details.clone(),
            awarded_at: self.awarded_at.to_rfc3339(),
            redeemable_at: self.redeemable_at.map(|date| date.format("%Y-%m-%d").to_string()),
            redeemed_at: self.redeemed_at.map(|at| at.to_rfc3339()),
            redeemed: self.is_redeemed(),
            redeemable: self.is_redeemable(today),
        }
    }
}
