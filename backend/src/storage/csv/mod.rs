//! # CSV Storage Module
//!
//! File-based storage for the advent calendar. One data directory holds
//! every file:
//!
//! - `calendar_days.csv` with one row per day (`day,stars,puzzle_answer`)
//! - `vouchers.csv` with awarded vouchers, append-only apart from redemption
//! - `messages.csv` and `puzzle_attempts.csv`, both append-only logs
//! - `voucher_options.yaml`, the prize catalog (a default is written on first read)
//! - `prompts.yaml`, hand-authored day content
//!
//! Rewrites go through a temp file and a rename. All repositories built
//! from one [`CsvConnection`] share its write lock, and writers in other
//! processes are held off by an advisory lock on `.advent.lock`.

pub mod calendar_day_repository;
pub mod connection;
pub mod csv_store;
pub mod message_repository;
pub mod prompt_repository;
pub mod puzzle_attempt_repository;
pub mod voucher_repository;

#[cfg(test)]
pub mod test_utils;

pub use calendar_day_repository::CalendarDayRepository;
pub use connection::CsvConnection;
pub use csv_store::CsvStore;
pub use message_repository::MessageRepository;
pub use prompt_repository::PromptRepository;
pub use puzzle_attempt_repository::PuzzleAttemptRepository;
pub use voucher_repository::VoucherRepository;
