use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

/// "Today" as the job sees it: computed once per run and shared by every
/// location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Today {
    pub date: NaiveDate,
    /// Monday = 0 .. Sunday = 6, matching the order of the weekly `days` array.
    pub weekday_index: u32,
    /// ISO 8601 week number.
    pub week_number: u32,
}

impl Today {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            date,
            weekday_index: date.weekday().num_days_from_monday(),
            week_number: date.iso_week().week(),
        }
    }

    /// Current calendar date in `tz`.
    pub fn now_in(tz: Tz) -> Self {
        Self::from_date(Utc::now().with_timezone(&tz).date_naive())
    }

    pub fn is_weekend(&self) -> bool {
        self.weekday_index > 4
    }

    /// `YYYY-MM-DD`, as the menu API expects it.
    pub fn query_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
