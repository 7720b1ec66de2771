//! Time utility functions
//!
//! Task timestamps are stored as milliseconds since the Unix epoch (UTC).

use chrono::{DateTime, Days, Months, Utc};

/// Milliseconds in one day
pub const DAY_MS: i64 = 86_400_000;

/// Current time as milliseconds since Unix epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse a timestamp given either as epoch milliseconds or RFC 3339
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// First millisecond of the UTC day containing `millis`
pub fn start_of_day(millis: i64) -> i64 {
    millis.div_euclid(DAY_MS) * DAY_MS
}

/// Last millisecond of the UTC day containing `millis`
pub fn end_of_day(millis: i64) -> i64 {
    start_of_day(millis) + DAY_MS - 1
}

/// Unit accepted by relative date expressions ("-7 days", "2 weeks")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeUnit {
    Days,
    Weeks,
    Months,
}

impl RelativeUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "days" => Some(Self::Days),
            "week" | "weeks" => Some(Self::Weeks),
            "month" | "months" => Some(Self::Months),
            _ => None,
        }
    }
}

/// Shift `now` by `amount` units, saturating at the representable range
pub fn shift(now: DateTime<Utc>, amount: i64, unit: RelativeUnit) -> Option<DateTime<Utc>> {
    let magnitude = amount.unsigned_abs();
    match unit {
        RelativeUnit::Days | RelativeUnit::Weeks => {
            let days = if unit == RelativeUnit::Weeks {
                magnitude.checked_mul(7)?
            } else {
                magnitude
            };
            if amount < 0 {
                now.checked_sub_days(Days::new(days))
            } else {
                now.checked_add_days(Days::new(days))
            }
        }
        RelativeUnit::Months => {
            let months = Months::new(u32::try_from(magnitude).ok()?);
            if amount < 0 {
                now.checked_sub_months(months)
            } else {
                now.checked_add_months(months)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    #[test]
    fn test_start_and_end_of_day() {
        // 2024-01-01 12:34:56.789 UTC
        let noon = 1704112496789;
        assert_eq!(start_of_day(noon), 1704067200000);
        assert_eq!(end_of_day(noon), 1704153599999);
    }

    #[test]
    fn test_start_of_day_before_epoch() {
        assert_eq!(start_of_day(-1), -DAY_MS);
        assert_eq!(end_of_day(-1), -1);
    }

    #[test]
    fn test_parse_timestamp_millis_and_rfc3339() {
        let a = parse_timestamp("1704067200000").unwrap();
        let b = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(a, b);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_shift_units() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 10, 0, 0).unwrap();
        assert_eq!(shift(now, -7, RelativeUnit::Days).unwrap().day(), 24);
        assert_eq!(shift(now, 1, RelativeUnit::Weeks).unwrap().month(), 4);
        // chrono clamps to the last day of the shorter month
        assert_eq!(shift(now, -1, RelativeUnit::Months).unwrap().day(), 29);
    }

    #[test]
    fn test_relative_unit_parse() {
        assert_eq!(RelativeUnit::parse("Days"), Some(RelativeUnit::Days));
        assert_eq!(RelativeUnit::parse("week"), Some(RelativeUnit::Weeks));
        assert_eq!(RelativeUnit::parse("years"), None);
    }
}
