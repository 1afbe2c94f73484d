//! Symbolic date-range resolution.
//!
//! The dashboard's date selector sends a symbolic token; every report
//! needs it as a concrete inclusive `[start, end]` pair. Resolution is
//! a pure function of the token and a caller-supplied "now"; nothing
//! in here reads a clock.
//!
//! Conventions:
//!   - Weeks start on Sunday.
//!   - Quarters start January / April / July / October.
//!   - `start` is midnight; `end` is 23:59:59.999 (inclusive bound).
//!   - Unrecognized tokens fall back to `thisMonth`.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateRange {
    Today,
    ThisWeek,
    #[default]
    ThisMonth,
    LastMonth,
    ThisQuarter,
    ThisYear,
}

impl DateRange {
    /// The wire token sent as the `dateRange` query parameter.
    pub fn token(self) -> &'static str {
        match self {
            DateRange::Today => "today",
            DateRange::ThisWeek => "thisWeek",
            DateRange::ThisMonth => "thisMonth",
            DateRange::LastMonth => "lastMonth",
            DateRange::ThisQuarter => "thisQuarter",
            DateRange::ThisYear => "thisYear",
        }
    }

    /// Human label for summaries and export covers.
    pub fn label(self) -> &'static str {
        match self {
            DateRange::Today => "Today",
            DateRange::ThisWeek => "This Week",
            DateRange::ThisMonth => "This Month",
            DateRange::LastMonth => "Last Month",
            DateRange::ThisQuarter => "This Quarter",
            DateRange::ThisYear => "This Year",
        }
    }

    /// Parse a wire token. Unrecognized tokens resolve as `thisMonth`.
    pub fn parse(token: &str) -> Self {
        match token {
            "today" => DateRange::Today,
            "thisWeek" => DateRange::ThisWeek,
            "thisMonth" => DateRange::ThisMonth,
            "lastMonth" => DateRange::LastMonth,
            "thisQuarter" => DateRange::ThisQuarter,
            "thisYear" => DateRange::ThisYear,
            _ => DateRange::ThisMonth,
        }
    }

    /// Resolve the token to a concrete inclusive `[start, end]` pair
    /// anchored at `now`.
    pub fn resolve(self, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let today = now.date();
        match self {
            DateRange::Today => (day_start(today), day_end(today)),
            DateRange::ThisWeek => {
                let sunday = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
                (day_start(sunday), day_end(sunday + Duration::days(6)))
            }
            DateRange::ThisMonth => {
                let first = month_start(today.year(), today.month());
                (day_start(first), day_end(month_end(today.year(), today.month())))
            }
            DateRange::LastMonth => {
                let first_of_this = month_start(today.year(), today.month());
                let last_of_prev = first_of_this - Duration::days(1);
                let first = month_start(last_of_prev.year(), last_of_prev.month());
                (day_start(first), day_end(last_of_prev))
            }
            DateRange::ThisQuarter => {
                let q_month = ((today.month() - 1) / 3) * 3 + 1;
                let first = month_start(today.year(), q_month);
                let last = month_end(today.year(), q_month + 2);
                (day_start(first), day_end(last))
            }
            DateRange::ThisYear => {
                let first = month_start(today.year(), 1);
                let last = month_end(today.year(), 12);
                (day_start(first), day_end(last))
            }
        }
    }
}

fn day_start(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

fn day_end(d: NaiveDate) -> NaiveDateTime {
    // 23:59:59.999, the range bound is inclusive.
    day_start(d) + Duration::milliseconds(86_400_000 - 1)
}

fn month_start(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn month_end(year: i32, month: u32) -> NaiveDate {
    let (next_y, next_m) = if month >= 12 { (year + 1, 1) } else { (year, month + 1) };
    month_start(next_y, next_m) - Duration::days(1)
}
