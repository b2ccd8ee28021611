//! Week arithmetic.
//!
//! Every generation is anchored to the Monday of its week. Human labels
//! number weeks within a month, where week 1 starts at the month's first
//! Monday; days before that Monday still belong to the previous month's
//! last week.
//!
//! ```
//! use chrono::NaiveDate;
//! use u_squad::week::{monday_of, WeekLabel};
//!
//! let thursday = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
//! assert_eq!(monday_of(thursday), NaiveDate::from_ymd_opt(2024, 1, 29).unwrap());
//! assert_eq!(WeekLabel::for_date(thursday).to_string(), "2024-01 week 5");
//! ```

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

/// Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Monday of the week before the one containing `date`.
pub fn previous_week(date: NaiveDate) -> NaiveDate {
    monday_of(date) - Duration::weeks(1)
}

/// First Monday on or after the 1st of the given month.
fn first_monday(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (7 - first.weekday().num_days_from_monday()) % 7;
    Some(first + Duration::days(offset as i64))
}

/// Month-relative week identifier, e.g. `2024-01 week 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekLabel {
    pub year: i32,
    pub month: u32,
    pub week: u32,
}

impl WeekLabel {
    /// Label of the week containing `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        let mut anchor = first_monday(date.year(), date.month());
        if !matches!(anchor, Some(m) if m <= date) {
            let prev = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                .and_then(|d| d.pred_opt())
                .unwrap_or(date);
            anchor = first_monday(prev.year(), prev.month());
        }
        // Only unreachable at the very edge of chrono's date range.
        let anchor = anchor.unwrap_or_else(|| monday_of(date));
        let days = (date - anchor).num_days().max(0);
        Self {
            year: anchor.year(),
            month: anchor.month(),
            week: (days / 7) as u32 + 1,
        }
    }
}

impl fmt::Display for WeekLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02} week {}", self.year, self.month, self.week)
    }
}
