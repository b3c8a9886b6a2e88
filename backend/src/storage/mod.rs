//! Storage layer: the [`AdventStore`] contract and its two backends.

pub mod csv;
pub mod memory;
pub mod traits;

pub use csv::CsvStore;
pub use memory::MemoryStore;
pub use traits::{
    AdventStore, DayStorage, MessageStorage, PromptContent, PromptStorage, PuzzleAttemptStorage, VoucherStorage,
};
