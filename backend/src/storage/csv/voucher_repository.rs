//! # CSV Voucher Repository
//!
//! Awarded vouchers live in `vouchers.csv`; the prize catalog lives in
//! `voucher_options.yaml` next to it.
//!
//! ```csv
//! id,title,details,awarded_at,redeemable_at,redeemed_at
//! voucher-0001,Massage,relax,2025-12-03T09:00:00Z,2025-12-24,
//! ```
//!
//! ```yaml
//! - title: Massage
//!   details: relax
//!   chance: 60
//!   redeemable_at: 2025-12-24
//! - title: Breakfast in bed
//!   details: weekend only
//!   chance: 40
//! ```
//!
//! New vouchers are appended in place; redemption rewrites the file through
//! a temp file. Both run under the connection's write lock, and both refuse
//! to proceed while any row fails to parse.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::connection::{CsvConnection, VOUCHERS_FILE, VOUCHER_OPTIONS_FILE};
use crate::domain::models::{VoucherDraft, VoucherOption, VoucherRecord};
use crate::storage::VoucherStorage;

const HEADER: &[&str] = &["id", "title", "details", "awarded_at", "redeemable_at", "redeemed_at"];

/// CSV record structure for awarded vouchers
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VoucherRow {
    id: String,
    title: String,
    details: String,
    awarded_at: DateTime<Utc>,
    redeemable_at: Option<NaiveDate>,
    redeemed_at: Option<DateTime<Utc>>,
}

impl From<&VoucherRecord> for VoucherRow {
    fn from(record: &VoucherRecord) -> Self {
        VoucherRow {
            id: record.id.clone(),
            title: record.title.clone(),
            details: record.details.clone(),
            awarded_at: record.awarded_at,
            redeemable_at: record.redeemable_at,
            redeemed_at: record.redeemed_at,
        }
    }
}

impl From<VoucherRow> for VoucherRecord {
    fn from(row: VoucherRow) -> Self {
        VoucherRecord {
            id: VoucherRecord::normalize_id(&row.id),
            title: row.title,
            details: row.details,
            awarded_at: row.awarded_at,
            redeemable_at: row.redeemable_at,
            redeemed_at: row.redeemed_at,
        }
    }
}

#[derive(Clone)]
pub struct VoucherRepository {
    connection: CsvConnection,
}

impl VoucherRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_vouchers(&self) -> Result<Vec<VoucherRecord>> {
        let rows: Vec<VoucherRow> = self.connection.read_rows(VOUCHERS_FILE, HEADER)?;
        Ok(rows.into_iter().map(VoucherRecord::from).collect())
    }

    /// Every row or an error. Used before counting, numbering or rewriting.
    fn read_vouchers_strict(&self) -> Result<Vec<VoucherRecord>> {
        let rows: Vec<VoucherRow> = self.connection.read_rows_strict(VOUCHERS_FILE, HEADER)?;
        Ok(rows.into_iter().map(VoucherRecord::from).collect())
    }

    /// Caller must hold the connection's write guard
    fn append_locked(&self, draft: &VoucherDraft) -> Result<VoucherRecord> {
        let existing = self.read_vouchers_strict()?;
        let record = VoucherRecord::from_draft(VoucherRecord::next_sequence(&existing), draft);
        self.connection
            .append_row(VOUCHERS_FILE, HEADER, &VoucherRow::from(&record))?;
        info!("Awarded voucher {} ({})", record.id, record.title);
        Ok(record)
    }

    /// Replace the prize catalog
    pub fn store_voucher_options(&self, options: &[VoucherOption]) -> Result<()> {
        let _guard = self.connection.write_guard()?;
        self.connection.write_yaml(VOUCHER_OPTIONS_FILE, &options)
    }
}

impl VoucherStorage for VoucherRepository {
    fn append_voucher(&self, draft: &VoucherDraft) -> Result<VoucherRecord> {
        let _guard = self.connection.write_guard()?;
        self.append_locked(draft)
    }

    fn append_voucher_within(&self, draft: &VoucherDraft, max_vouchers: usize) -> Result<Option<VoucherRecord>> {
        let _guard = self.connection.write_guard()?;
        let claimed = self.read_vouchers_strict()?.len();
        if claimed >= max_vouchers {
            info!("Voucher limit reached ({} of {}), not appending", claimed, max_vouchers);
            return Ok(None);
        }
        self.append_locked(draft).map(Some)
    }

    fn update_voucher(&self, id: &str, redeemed_at: DateTime<Utc>) -> Result<Option<VoucherRecord>> {
        let _guard = self.connection.write_guard()?;
        let mut vouchers = self.read_vouchers_strict()?;

        let updated = match vouchers.iter_mut().find(|voucher| voucher.id == id) {
            Some(entry) if entry.redeemed_at.is_some() => {
                warn!("Voucher {} already redeemed, leaving it unchanged", id);
                return Ok(Some(entry.clone()));
            }
            Some(entry) => {
                entry.redeemed_at = Some(redeemed_at);
                entry.clone()
            }
            None => return Ok(None),
        };

        let rows: Vec<VoucherRow> = vouchers.iter().map(VoucherRow::from).collect();
        self.connection.write_rows(VOUCHERS_FILE, HEADER, &rows)?;
        info!("Redeemed voucher {}", id);
        Ok(Some(updated))
    }

    fn all_vouchers(&self) -> Result<Vec<VoucherRecord>> {
        self.read_vouchers()
    }

    fn find_voucher(&self, id: &str) -> Result<Option<VoucherRecord>> {
        Ok(self.read_vouchers()?.into_iter().find(|voucher| voucher.id == id))
    }

    fn voucher_options(&self) -> Result<Vec<VoucherOption>> {
        if let Some(options) = self.connection.read_yaml::<Vec<VoucherOption>>(VOUCHER_OPTIONS_FILE)? {
            return Ok(options);
        }

        let _guard = self.connection.write_guard()?;
        let defaults = VoucherOption::default_catalog();
        self.connection.write_yaml(VOUCHER_OPTIONS_FILE, &defaults)?;
        info!("Created default voucher catalog at {:?}", self.connection.file_path(VOUCHER_OPTIONS_FILE));
        Ok(defaults)
    }
}
