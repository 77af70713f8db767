//! Calendar features derived from a date

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Calendar fields that are recomputed as a forecast advances day by day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarFeatures {
    /// Monday = 0 ... Sunday = 6
    pub day_of_week: f64,
    pub day_of_month: f64,
    pub month: f64,
    /// 1.0 on Saturday and Sunday
    pub is_weekend: f64,
}

impl CalendarFeatures {
    pub fn from_date(date: NaiveDate) -> Self {
        let weekday = date.weekday();
        let is_weekend = matches!(weekday, Weekday::Sat | Weekday::Sun);

        Self {
            day_of_week: f64::from(weekday.num_days_from_monday()),
            day_of_month: f64::from(date.day()),
            month: f64::from(date.month()),
            is_weekend: if is_weekend { 1.0 } else { 0.0 },
        }
    }
}

/// `count` consecutive dates beginning at `start` (inclusive).
///
/// Stops early if the calendar runs out, which only happens at the edge of
/// chrono's supported range.
pub fn day_sequence(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count as u64)
        .map_while(|offset| start.checked_add_days(Days::new(offset)))
        .collect()
}
