use chrono::{Local, NaiveDate, TimeDelta};

use crate::error::{StoreError, StoreResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a strict `YYYY-MM-DD` calendar date.
///
/// chrono's own parser accepts signs and short fields, so the shape is checked
/// byte by byte before the calendar check.
pub fn validate(input: &str) -> StoreResult<NaiveDate> {
    let invalid = || StoreError::InvalidDate(input.to_string());

    let bytes = input.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(invalid());
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 4 && *i != 7)
        .all(|(_, b)| b.is_ascii_digit());
    if !digits_ok {
        return Err(invalid());
    }

    let year: i32 = input[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = input[5..7].parse().map_err(|_| invalid())?;
    let day: u32 = input[8..10].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Validates an optional date, falling back to today when absent.
pub fn validate_or_today(input: Option<&str>) -> StoreResult<NaiveDate> {
    match input {
        Some(text) => validate(text),
        None => Ok(today()),
    }
}

pub fn is_past(date: NaiveDate, reference: NaiveDate) -> bool {
    date < reference
}

pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days().abs()
}

pub fn offset(base: NaiveDate, delta_days: i64) -> StoreResult<NaiveDate> {
    TimeDelta::try_days(delta_days)
        .and_then(|delta| base.checked_add_signed(delta))
        .ok_or_else(|| StoreError::InvalidDate(format!("{} {:+} days", format(base), delta_days)))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Serde adapter that stores dates as `YYYY-MM-DD` and re-validates them
/// strictly when reading.
pub mod serde_ymd {
    use chrono::NaiveDate;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::validate(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_accepts_strict_format() {
        assert_eq!(validate("2026-01-05").unwrap(), ymd(2026, 1, 5));
        assert_eq!(validate("2024-02-29").unwrap(), ymd(2024, 2, 29));
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        for input in ["", "2026-1-05", "26-01-05", "2026/01/05", "+2026-01-5", " 2026-01-05", "2026-01-05 ", "２０２６-01-05"] {
            assert!(matches!(validate(input), Err(StoreError::InvalidDate(_))), "{input:?}");
        }
    }

    #[test]
    fn test_validate_rejects_impossible_dates() {
        assert!(validate("2026-13-40").is_err());
        assert!(validate("2026-02-30").is_err());
        assert!(validate("2025-02-29").is_err());
        assert!(validate("2026-00-10").is_err());
    }

    #[test]
    fn test_is_past_is_strict() {
        let reference = ymd(2026, 3, 10);
        assert!(is_past(ymd(2026, 3, 9), reference));
        assert!(!is_past(reference, reference));
        assert!(!is_past(ymd(2026, 3, 11), reference));
    }

    #[test]
    fn test_days_between_is_absolute() {
        assert_eq!(days_between(ymd(2026, 1, 1), ymd(2026, 3, 1)), 59);
        assert_eq!(days_between(ymd(2026, 3, 1), ymd(2026, 1, 1)), 59);
        assert_eq!(days_between(ymd(2026, 1, 1), ymd(2026, 1, 1)), 0);
    }

    #[test]
    fn test_offset_both_directions() {
        assert_eq!(offset(ymd(2026, 1, 30), 3).unwrap(), ymd(2026, 2, 2));
        assert_eq!(offset(ymd(2026, 1, 1), -1).unwrap(), ymd(2025, 12, 31));
        assert!(offset(ymd(2026, 1, 1), i64::MAX).is_err());
    }
}
