//! Time source for the domain services.
//!
//! Services never read the wall clock directly so that lock dates and
//! award timestamps can be pinned in tests.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use std::sync::{Arc, Mutex};

pub trait Clock: Send + Sync {
    /// Current instant, used for award and redemption timestamps
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date, used for redeemable-date checks
    fn today(&self) -> NaiveDate;
}

/// Wall clock; `today` follows the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Settable clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(Mutex::new(instant)),
        }
    }

    /// Noon UTC on the given date
    pub fn on(day: NaiveDate) -> Self {
        let noon = day.and_hms_opt(12, 0, 0).expect("12:00:00 is a valid time");
        Self::new(DateTime::from_naive_utc_and_offset(noon, Utc))
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.lock() = instant;
    }

    pub fn advance_days(&self, days: i64) {
        let mut guard = self.lock();
        *guard += Duration::days(days);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        // A poisoned lock still holds a valid instant.
        self.instant.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
