use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub const MILLISECONDS_PER_HOUR: i64 = 60 * 60 * 1000;
pub const MILLISECONDS_PER_MINUTE: i64 = 60 * 1000;

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].trim().parse::<u32>().ok()?;
    let minute = parts[1].trim().parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Hours and minutes of a timestamp as a duration, seconds are dropped
pub fn hours_and_minutes(value: &NaiveDateTime) -> Duration {
    hours_minutes_duration(value.hour(), value.minute())
}

/// Duration of `hours` hours plus `minutes` minutes
pub fn hours_minutes_duration(hours: u32, minutes: u32) -> Duration {
    Duration::milliseconds(
        i64::from(hours) * MILLISECONDS_PER_HOUR + i64::from(minutes) * MILLISECONDS_PER_MINUTE,
    )
}

/// Duration of a possibly fractional number of minutes, rounded to the millisecond
pub fn minutes_duration(minutes: f64) -> Option<Duration> {
    let millis = (minutes * MILLISECONDS_PER_MINUTE as f64).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

/// The same calendar day at midnight
pub fn date_only(value: &NaiveDateTime) -> NaiveDateTime {
    value.date().and_time(NaiveTime::MIN)
}

/// Midnight on the first of January of `year`
pub fn start_of_year(year: i32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1).map(|date| date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_time() {
        // Valid cases
        assert_eq!(parse_time("00:00"), Some((0, 0)));
        assert_eq!(parse_time("01:30"), Some((1, 30)));
        assert_eq!(parse_time("23:59"), Some((23, 59)));

        // Invalid cases
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("12:60"), None);
        assert_eq!(parse_time("12:30:45"), None);
        assert_eq!(parse_time("12"), None);
        assert_eq!(parse_time("ab:30"), None);
    }

    #[test]
    fn test_hours_and_minutes_ignores_date_and_seconds() {
        let value = at(1899, 12, 30, 9, 15, 42);
        assert_eq!(hours_and_minutes(&value), Duration::minutes(9 * 60 + 15));
    }

    #[test]
    fn test_minutes_duration() {
        assert_eq!(minutes_duration(45.0), Some(Duration::minutes(45)));
        assert_eq!(minutes_duration(0.5), Some(Duration::seconds(30)));
        assert_eq!(minutes_duration(f64::NAN), None);
        assert_eq!(minutes_duration(f64::INFINITY), None);

        // Out of range for a duration in either direction
        let limit = i64::MAX as f64 / MILLISECONDS_PER_MINUTE as f64;
        assert_eq!(minutes_duration(-limit), None);
        assert_eq!(minutes_duration(limit), None);
        assert_eq!(minutes_duration(f64::MIN), None);
    }

    #[test]
    fn test_date_only() {
        assert_eq!(date_only(&at(2024, 1, 5, 13, 45, 10)), at(2024, 1, 5, 0, 0, 0));
    }

    #[test]
    fn test_start_of_year() {
        assert_eq!(start_of_year(1999), Some(at(1999, 1, 1, 0, 0, 0)));
    }
}
