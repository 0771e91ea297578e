// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and calendar-day arithmetic.
//!
//! All day boundaries are UTC calendar dates.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Whole calendar days from `earlier` to `later` (negative if `later` is
/// on an earlier day).
pub fn calendar_day_diff(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later.date_naive() - earlier.date_naive()).num_days()
}

/// True when both timestamps fall on the same calendar day.
pub fn is_same_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Weekday index with 0 = Sunday through 6 = Saturday.
pub fn weekday_index(date: DateTime<Utc>) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_format_utc_rfc3339() {
        assert_eq!(format_utc_rfc3339(at(2024, 1, 15, 10)), "2024-01-15T10:00:00Z");
    }

    #[test]
    fn test_day_diff_uses_calendar_dates() {
        // 23:00 -> 01:00 next day is two hours apart but one calendar day
        assert_eq!(calendar_day_diff(at(2024, 1, 15, 23), at(2024, 1, 16, 1)), 1);
        assert_eq!(calendar_day_diff(at(2024, 1, 15, 1), at(2024, 1, 15, 23)), 0);
        assert_eq!(calendar_day_diff(at(2024, 1, 15, 8), at(2024, 1, 12, 8)), -3);
    }

    #[test]
    fn test_weekday_index_sunday_is_zero() {
        // 2024-01-14 was a Sunday, 2024-01-20 a Saturday
        assert_eq!(weekday_index(at(2024, 1, 14, 12)), 0);
        assert_eq!(weekday_index(at(2024, 1, 20, 12)), 6);
    }

    #[test]
    fn test_is_same_day() {
        assert!(is_same_day(at(2024, 1, 15, 0), at(2024, 1, 15, 23)));
        assert!(!is_same_day(at(2024, 1, 15, 23), at(2024, 1, 16, 0)));
    }
}
