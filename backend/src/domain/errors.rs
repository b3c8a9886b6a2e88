//! Error taxonomy for the advent engine.
//!
//! Configuration errors mean authored data is broken and the operation must
//! abort. Domain errors are expected outcomes the caller turns into a
//! user-facing message. Storage failures carry the backend's own context.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdventError {
    #[error("Voucher catalogue is empty")]
    EmptyVoucherCatalog,

    #[error("Voucher chances must sum to 100 (got {total})")]
    InvalidChanceTotal { total: u64 },

    #[error("Missing advent prompt for {day}")]
    MissingPrompt { day: NaiveDate },

    #[error("Unknown puzzle format for {day}: {value}")]
    UnknownPuzzleFormat { day: NaiveDate, value: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No draw unlocked yet")]
    NoEligibleDraws,

    #[error("Voucher not found: {id}")]
    VoucherNotFound { id: String },

    #[error("Voucher already redeemed: {id}")]
    VoucherAlreadyRedeemed { id: String },

    #[error("Voucher {id} not redeemable until {redeemable_at}")]
    VoucherNotRedeemable { id: String, redeemable_at: NaiveDate },

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Unable to record message: {0}")]
    MessageSubmission(#[source] anyhow::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AdventError {
    /// Broken authored data or configuration; never retried.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            AdventError::EmptyVoucherCatalog
                | AdventError::InvalidChanceTotal { .. }
                | AdventError::MissingPrompt { .. }
                | AdventError::UnknownPuzzleFormat { .. }
                | AdventError::InvalidConfig(_)
        )
    }

    /// Expected outcomes the caller reports back to the user.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            AdventError::NoEligibleDraws
                | AdventError::VoucherNotFound { .. }
                | AdventError::VoucherAlreadyRedeemed { .. }
                | AdventError::VoucherNotRedeemable { .. }
                | AdventError::EmptyMessage
        )
    }
}

pub type AdventResult<T> = std::result::Result<T, AdventError>;
