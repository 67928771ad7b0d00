//! Date/time parsing and formatting helpers for HL7 value fields
//!
//! HL7 encodes dates and timestamps as bare digit strings (`DT`/`TM`/`DTM`/`TS`);
//! these helpers convert between that wire format and `chrono` types for the
//! message builders.

use chrono::{NaiveDate, NaiveDateTime};

/// Parse HL7 date (DT) format: YYYYMMDD or YYYY or YYYYMM
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    match s.len() {
        4 => {
            // YYYY
            let year = s.parse::<i32>().ok()?;
            NaiveDate::from_ymd_opt(year, 1, 1)
        }
        6 => {
            // YYYYMM
            let year = s[0..4].parse::<i32>().ok()?;
            let month = s[4..6].parse::<u32>().ok()?;
            NaiveDate::from_ymd_opt(year, month, 1)
        }
        8 => {
            // YYYYMMDD
            let year = s[0..4].parse::<i32>().ok()?;
            let month = s[4..6].parse::<u32>().ok()?;
            let day = s[6..8].parse::<u32>().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        }
        _ => None,
    }
}

/// Parse HL7 timestamp (TS/DTM) format: YYYYMMDDHHMMSS[.SSSS][+/-ZZZZ]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if s.len() < 8 {
        return None;
    }

    let year = s[0..4].parse::<i32>().ok()?;
    let month = s[4..6].parse::<u32>().ok()?;
    let day = s[6..8].parse::<u32>().ok()?;

    let (hour, minute, second) = if s.len() >= 14 {
        let h = s[8..10].parse::<u32>().ok()?;
        let m = s[10..12].parse::<u32>().ok()?;
        let sec = s[12..14].parse::<u32>().ok()?;
        (h, m, sec)
    } else if s.len() >= 12 {
        let h = s[8..10].parse::<u32>().ok()?;
        let m = s[10..12].parse::<u32>().ok()?;
        (h, m, 0)
    } else if s.len() >= 10 {
        let h = s[8..10].parse::<u32>().ok()?;
        (h, 0, 0)
    } else {
        (0, 0, 0)
    };

    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(hour, minute, second)
}

/// Format a date to HL7 DT format (YYYYMMDD)
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Format a timestamp to HL7 TS format (YYYYMMDDHHMMSS)
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format("%Y%m%d%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("20240315"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(
            parse_date("202403"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(
            parse_date("2024"),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(parse_date("invalid"), None);
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("20240315143000").unwrap();
        assert_eq!(ts.format("%Y%m%d%H%M%S").to_string(), "20240315143000");

        let ts2 = parse_timestamp("20240315").unwrap();
        assert_eq!(ts2.format("%Y%m%d").to_string(), "20240315");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(format_date(&date), "20240315");
    }

    #[test]
    fn test_format_timestamp() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(14, 30, 45)
            .unwrap();
        assert_eq!(format_timestamp(&dt), "20240315143045");
    }
}
