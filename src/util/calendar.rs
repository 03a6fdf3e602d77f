//! Business-day arithmetic.
//!
//! Every scheduling window, throttle push-out and window extension counts
//! Monday through Friday only. Holidays are not modelled.

use chrono::{Datelike, Months, NaiveDate, Weekday};

/// True for Monday through Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Roll a Saturday or Sunday forward to the following Monday.
pub fn roll_to_business_day(date: NaiveDate) -> NaiveDate {
    date.iter_days()
        .find(|d| is_business_day(*d))
        .unwrap_or(date)
}

/// The first `count` business days starting at `start` (inclusive, after
/// rolling a weekend start forward).
pub fn business_days_from(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    roll_to_business_day(start)
        .iter_days()
        .filter(|d| is_business_day(*d))
        .take(count)
        .collect()
}

/// The `count` business days strictly after `date`.
pub fn business_days_after(date: NaiveDate, count: usize) -> Vec<NaiveDate> {
    date.iter_days()
        .skip(1)
        .filter(|d| is_business_day(*d))
        .take(count)
        .collect()
}

/// The `n`-th business day strictly after `date`; `n == 0` returns `date`.
pub fn add_business_days(date: NaiveDate, n: u32) -> NaiveDate {
    if n == 0 {
        return date;
    }
    date.iter_days()
        .skip(1)
        .filter(|d| is_business_day(*d))
        .nth(n as usize - 1)
        .unwrap_or(NaiveDate::MAX)
}

/// Add calendar months, clamping the day to the end of a shorter month.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}
