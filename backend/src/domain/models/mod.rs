//! Domain models for the advent calendar.
//!
//! These are the records the storage layer persists and the services
//! operate on. Display-oriented views live in the `shared` crate.

pub mod day_record;
pub mod voucher;
pub mod puzzle_attempt;
pub mod message;

pub use day_record::DayRecord;
pub use voucher::{VoucherDraft, VoucherOption, VoucherRecord};
pub use puzzle_attempt::PuzzleAttempt;
pub use message::Message;
