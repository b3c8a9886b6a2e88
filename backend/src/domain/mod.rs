//! # Domain Layer
//!
//! Business logic for the advent calendar. Services hold a shared store
//! handle and a clock, read fresh state on every call, and keep nothing
//! mutable of their own, so they are cheap to build per request.
//!
//! - [`CheckInService`]: the per-day `Part1 -> Part2 -> Done` progression
//! - [`PromptService`]: day content and riddle matching
//! - [`RewardService`]: milestones, the weighted voucher lottery, redemption
//! - [`MessageService`]: free-text notes
//! - [`CalendarService`]: days left in the season, time to midnight

pub mod calendar;
pub mod check_in_service;
pub mod clock;
pub mod errors;
pub mod message_service;
pub mod models;
pub mod prompt_service;
pub mod reward_service;
pub mod weighted_draw;

pub use calendar::CalendarService;
pub use check_in_service::CheckInService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{AdventError, AdventResult};
pub use message_service::MessageService;
pub use prompt_service::PromptService;
pub use reward_service::{RewardService, DEFAULT_VOUCHER_MILESTONES};
pub use weighted_draw::TicketSource;
