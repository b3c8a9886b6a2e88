//! Calendar arithmetic for the advent season.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};

/// Date helpers anchored on the configured end of the season
#[derive(Debug, Clone, Copy)]
pub struct CalendarService {
    season_end: NaiveDate,
}

impl CalendarService {
    pub fn new(season_end: NaiveDate) -> Self {
        Self { season_end }
    }

    pub fn season_end(&self) -> NaiveDate {
        self.season_end
    }

    /// Whole days from `day` until the season ends. Negative once it is over.
    pub fn days_left(&self, day: NaiveDate) -> i64 {
        (self.season_end - day).num_days()
    }

    /// Seconds until the next midnight in `now`'s timezone, floored at zero.
    pub fn seconds_until_midnight<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> i64 {
        let tomorrow = now.date_naive() + Duration::days(1);
        let midnight = match tomorrow
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| now.timezone().from_local_datetime(&naive).earliest())
        {
            Some(midnight) => midnight,
            None => return 0,
        };
        (midnight - now.clone()).num_seconds().max(0)
    }

    /// `seconds_until_midnight` for the local wall clock
    pub fn seconds_until_local_midnight(&self) -> i64 {
        self.seconds_until_midnight(&Local::now())
    }
}
