//! Lenient field parsing for imported text.
//!
//! Field-level problems never fail an import: an unparsable value becomes
//! `None` and the caller picks the fallback. Only primary keys are strict.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use domain::DomainError;
use regex::Regex;
use std::sync::LazyLock;

static TZ_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:[+-]\d{2}:?\d{2}|Z)$").expect("timezone pattern is valid"));

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Date formats accepted by the single assets file
const LOOSE_DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%m-%d-%Y", "%d/%m/%Y"];

/// Trimmed text, `None` for empty cells and the usual null spellings.
pub fn text(raw: &str) -> Option<String> {
    let value = raw.trim();
    match value {
        "" | "None" | "none" | "null" | "NULL" | "nan" | "NaN" => None,
        _ => Some(value.to_string()),
    }
}

/// Timestamp in UTC. A trailing offset is dropped, not applied.
pub fn timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let value = text(raw)?;
    let value = TZ_SUFFIX.replace(&value, "");
    let value = value.replacen('T', " ", 1);

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .map(|dt| dt.and_utc())
}

/// `created_at` style timestamp, "now" when missing or unreadable.
pub fn timestamp_or_now(raw: &str) -> DateTime<Utc> {
    timestamp(raw).unwrap_or_else(Utc::now)
}

/// Plain `YYYY-MM-DD` date. A time part, if present, is ignored.
pub fn date(raw: &str) -> Option<NaiveDate> {
    let value = text(raw)?;
    let day = value.get(..10).unwrap_or(&value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Date in any of the spreadsheet formats, as midnight UTC.
pub fn loose_date(raw: &str) -> Option<DateTime<Utc>> {
    let value = text(raw)?;
    LOOSE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&value, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

pub fn float(raw: &str) -> Option<f64> {
    text(raw)?.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer, also accepting whole floats such as `3.0` from spreadsheet exports.
pub fn int(raw: &str) -> Option<i32> {
    let value = text(raw)?;
    if let Ok(v) = value.parse::<i32>() {
        return Some(v);
    }
    let v = value.parse::<f64>().ok()?;
    (v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64).then_some(v as i32)
}

/// Integer primary key. Unlike other fields this is fatal when unreadable.
pub fn int_key(table: &'static str, raw: &str) -> Result<i32, DomainError> {
    int(raw).ok_or_else(|| {
        DomainError::invalid_record(table, format!("invalid integer primary key '{}'", raw.trim()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_timestamp_formats() {
        let ts = timestamp("2024-05-22 14:03:09.123456").unwrap();
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (14, 3, 9));

        let ts = timestamp("2024-05-22 14:03:09").unwrap();
        assert_eq!(ts.day(), 22);

        let ts = timestamp("2024-05-22").unwrap();
        assert_eq!((ts.hour(), ts.minute()), (0, 0));
    }

    #[test]
    fn test_timestamp_drops_offset_and_accepts_t() {
        let ts = timestamp("2024-05-22T14:03:09+02:00").unwrap();
        assert_eq!(ts.hour(), 14);
        assert_eq!(timestamp("2024-05-22T14:03:09Z").unwrap().hour(), 14);
        assert_eq!(timestamp("2024-05-22 14:03:09-0500").unwrap().hour(), 14);
    }

    #[test]
    fn test_timestamp_garbage_is_none() {
        assert!(timestamp("").is_none());
        assert!(timestamp("None").is_none());
        assert!(timestamp("45:23.0").is_none());
        assert!(timestamp("yesterday").is_none());
    }

    #[test]
    fn test_date() {
        assert_eq!(date("2019-03-01"), NaiveDate::from_ymd_opt(2019, 3, 1));
        assert_eq!(date("2019-03-01 00:00:00"), NaiveDate::from_ymd_opt(2019, 3, 1));
        assert!(date("03/01/2019").is_none());
        assert!(date("").is_none());
    }

    #[test]
    fn test_loose_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 22).unwrap();
        for raw in ["5/22/2024", "2024-05-22", "05-22-2024", "22/05/2024"] {
            assert_eq!(loose_date(raw).unwrap().date_naive(), expected, "{raw}");
        }
        assert!(loose_date("May 22nd").is_none());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(float(" 12.5 "), Some(12.5));
        assert_eq!(float("nan"), None);
        assert_eq!(float("abc"), None);
        assert_eq!(int("7"), Some(7));
        assert_eq!(int("7.0"), Some(7));
        assert_eq!(int("7.5"), None);
        assert_eq!(int(""), None);
    }

    #[test]
    fn test_int_key_is_strict() {
        assert_eq!(int_key("locations", "12").unwrap(), 12);
        assert!(int_key("locations", "").is_err());
        assert!(int_key("locations", "twelve").is_err());
    }
}
