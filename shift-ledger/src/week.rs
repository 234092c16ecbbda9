//! Weekly window arithmetic
//!
//! The accumulation window restarts at midnight of a fixed weekday in the
//! reference time zone. All decisions reduce to one comparison: a stored row
//! is inside the current window iff its date is on or after the most recent
//! occurrence of the reset weekday. Resetting lazily against that comparison
//! fires exactly once per cycle no matter how many submissions land on the
//! reset day itself.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc, Weekday};

/// Current instant in the reference time zone
pub fn now_in(offset: FixedOffset) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&offset)
}

/// Most recent occurrence of the reset weekday, on or before `today`
pub fn week_start(today: NaiveDate, reset: Weekday) -> NaiveDate {
    let days_since =
        (today.weekday().num_days_from_monday() + 7 - reset.num_days_from_monday()) % 7;
    today - Duration::days(i64::from(days_since))
}

/// Whether a stored row belongs to the window containing `today`
pub fn in_current_window(row_date: NaiveDate, today: NaiveDate, reset: Weekday) -> bool {
    row_date >= week_start(today, reset)
}
