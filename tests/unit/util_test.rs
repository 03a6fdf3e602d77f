//! Tests for utility functions

use chrono::NaiveDate;
use prometheus_dialer_pool::util::{
    add_business_days, add_months, business_days_from, is_business_day, now_ms, Clock,
    FixedClock,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_window_never_contains_weekends() {
    let days = business_days_from(ymd(2026, 10, 17), 20);
    assert_eq!(days.len(), 20);
    assert_eq!(days[0], ymd(2026, 10, 19));
    assert!(days.iter().all(|d| is_business_day(*d)));
    assert!(days.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_add_business_days_across_weekend() {
    assert_eq!(add_business_days(ymd(2026, 10, 23), 1), ymd(2026, 10, 26));
    assert_eq!(add_business_days(ymd(2026, 10, 19), 10), ymd(2026, 11, 2));
}

#[test]
fn test_add_months_clamps_month_end() {
    assert_eq!(add_months(ymd(2026, 8, 31), 6), ymd(2027, 2, 28));
    assert_eq!(add_months(ymd(2026, 10, 19), 12), ymd(2027, 10, 19));
}

#[test]
fn test_fixed_clock() {
    let clock = FixedClock(ymd(2026, 10, 19));
    assert_eq!(clock.today(), ymd(2026, 10, 19));
}

#[test]
fn test_now_ms_is_positive() {
    assert!(now_ms() > 0);
}

#[test]
fn test_init_tracing_is_idempotent() {
    prometheus_dialer_pool::util::init_tracing();
    prometheus_dialer_pool::util::init_tracing();
    assert!(tracing::dispatcher::has_been_set());
}

#[test]
fn test_default_log_filter_parses() {
    let filter = tracing_subscriber::EnvFilter::try_new(prometheus_dialer_pool::util::DEFAULT_LOG_FILTER);
    assert!(filter.is_ok());
}
