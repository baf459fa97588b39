use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

const TIME_FORMATS: [&str; 3] = ["%H:%M", "%H:%M:%S", "%I:%M %p"];

/// Parses a calendar date as written in the string.
///
/// Timestamps keep the date they spell out; the offset is never applied.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(s) {
        return Some(timestamp.naive_local().date());
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date())
}

/// Parses a time of day to minute precision; seconds are dropped.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    let time = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(s, format).ok())?;
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)
}

/// Accepts `Mon` as well as `Monday`, in any case.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    s.trim().parse().ok()
}

/// Hours since midnight, with minutes as the fractional part.
pub fn fractional_hours(time: NaiveTime) -> f64 {
    f64::from(time.hour()) + f64::from(time.minute()) / 60.0
}
