//! Date-key derivation
//!
//! Single source of truth for the DimDate surrogate key. Both the date
//! dimension and every fact table resolve their `date_id` through
//! [`date_key`], so the two can never disagree.
//!
//! Key scheme: `date_id = year * 10000 + month * 100 + day`, e.g. 2025-09-04
//! maps to 20250904. The key depends only on the calendar date.
//!
//! Day-of-week numbering: 0 = Sunday through 6 = Saturday.

use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Format used for the `fullDate` column and for parsing the date portion
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar attributes of one day, keyed by its integer surrogate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DateKey {
    pub date_id: i64,
    pub full_date: NaiveDate,
    pub year: i32,
    pub quarter: u32,
    pub month: u32,
    pub day_of_week: u32,
}

impl DateKey {
    /// Derive key and attributes from an already-parsed calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        let year = date.year();
        let month = date.month();
        Self {
            date_id: i64::from(year) * 10_000 + i64::from(month) * 100 + i64::from(date.day()),
            full_date: date,
            year,
            quarter: quarter(month),
            month,
            day_of_week: date.weekday().num_days_from_sunday(),
        }
    }

    /// `fullDate` column value (`YYYY-MM-DD`)
    pub fn full_date_string(&self) -> String {
        self.full_date.format(DATE_FORMAT).to_string()
    }
}

/// Derive the date key for a timestamp or date string.
///
/// Accepts `YYYY-MM-DD` optionally followed by whitespace (or `T`) and a
/// time component; the time of day is discarded. Unparseable input is an
/// error, never a zero key.
pub fn date_key(input: &str) -> Result<DateKey> {
    let date_part = input
        .trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or_default();

    if date_part.is_empty() {
        return Err(Error::DateParse {
            input: input.to_string(),
            reason: "empty date".to_string(),
        });
    }

    let date = NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|e| Error::DateParse {
        input: input.to_string(),
        reason: e.to_string(),
    })?;

    Ok(DateKey::from_date(date))
}

/// Calendar quarter (1-4) of a month (1-12)
fn quarter(month: u32) -> u32 {
    month.saturating_sub(1) / 3 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key_scheme() {
        let key = date_key("2025-09-04").unwrap();
        assert_eq!(key.date_id, 20250904);
        assert_eq!(key.year, 2025);
        assert_eq!(key.month, 9);
        assert_eq!(key.quarter, 3);
        assert_eq!(key.full_date_string(), "2025-09-04");
    }

    #[test]
    fn test_time_of_day_ignored() {
        let with_time = date_key("2025-09-04 20:00:00").unwrap();
        let date_only = date_key("2025-09-04").unwrap();
        assert_eq!(with_time, date_only);

        let late = date_key("2025-09-04 23:59:59").unwrap();
        assert_eq!(late.date_id, date_only.date_id);
    }

    #[test]
    fn test_iso_t_separator() {
        assert_eq!(date_key("2025-09-04T00:15:00").unwrap().date_id, 20250904);
    }

    #[test]
    fn test_deterministic() {
        for input in ["2024-01-10", "2025-09-01 22:30:00", "1999-12-31"] {
            assert_eq!(date_key(input).unwrap(), date_key(input).unwrap());
        }
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(date_key("  2025-09-01 20:00:00 ").unwrap().date_id, 20250901);
    }

    #[test]
    fn test_quarters() {
        assert_eq!(quarter(1), 1);
        assert_eq!(quarter(3), 1);
        assert_eq!(quarter(4), 2);
        assert_eq!(quarter(9), 3);
        assert_eq!(quarter(10), 4);
        assert_eq!(quarter(12), 4);
    }

    #[test]
    fn test_quarter_of_month_zero_does_not_underflow() {
        assert_eq!(quarter(0), 1);
    }

    #[test]
    fn test_day_of_week_sunday_is_zero() {
        // 2025-09-07 is a Sunday, 2025-09-04 a Thursday
        assert_eq!(date_key("2025-09-07").unwrap().day_of_week, 0);
        assert_eq!(date_key("2025-09-04").unwrap().day_of_week, 4);
        assert_eq!(date_key("2025-09-06").unwrap().day_of_week, 6);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(date_key("not a date"), Err(Error::DateParse { .. })));
        assert!(matches!(date_key(""), Err(Error::DateParse { .. })));
        assert!(matches!(date_key("   "), Err(Error::DateParse { .. })));
        assert!(matches!(date_key("2025/09/04"), Err(Error::DateParse { .. })));
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(date_key("2025-02-30").is_err());
        assert!(date_key("2025-13-01").is_err());
        assert!(date_key("2024-02-29").is_ok());
    }

    #[test]
    fn test_key_order_matches_calendar_order() {
        let a = date_key("2024-12-31").unwrap();
        let b = date_key("2025-01-01").unwrap();
        assert!(a.date_id < b.date_id);
    }
}
