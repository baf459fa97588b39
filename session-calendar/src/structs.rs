use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::parser::{parse_date, parse_time, parse_weekday};

/// A recurring session as supplied by the upstream API.
///
/// Every field is kept in its raw textual form. Parsing happens lazily and a
/// record whose dates or times cannot be parsed is left out of the derived
/// views instead of failing them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "camelCase", from = "crate::raw::RawSessionRecord")
)]
pub struct SessionRecord {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub session_days: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
}

impl SessionRecord {
    /// Parsed date range and weekdays, or `None` if either date is malformed.
    #[must_use]
    pub fn schedule(&self) -> Option<Schedule> {
        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;

        let days = self
            .session_days
            .iter()
            .filter_map(|tag| {
                let weekday = parse_weekday(tag);
                if weekday.is_none() {
                    log::debug!("Ignoring unknown weekday {tag:?} on session {}", self.id);
                }
                weekday
            })
            .collect();

        Some(Schedule { start, end, days })
    }

    /// Parsed daily time window, or `None` if it is malformed or not
    /// strictly increasing.
    #[must_use]
    pub fn times(&self) -> Option<(NaiveTime, NaiveTime)> {
        let start = parse_time(&self.start_time)?;
        let end = parse_time(&self.end_time)?;
        (start < end).then_some((start, end))
    }
}

/// Weekdays on which a session recurs, indexed Sun=0 through Sat=6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, weekday: Weekday) {
        self.0 |= 1 << weekday.num_days_from_sunday();
    }

    #[must_use]
    pub fn contains(self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday.num_days_from_sunday()) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::empty();
        for weekday in iter {
            set.insert(weekday);
        }
        set
    }
}

/// The validated recurrence pattern of a [`SessionRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: WeekdaySet,
}

impl Schedule {
    /// Inclusive on both ends of the date range.
    #[must_use]
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end && self.days.contains(date.weekday())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventRef {
    pub id: String,
    pub kind: String,
}

/// One day of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub count: usize,
    pub events: Vec<EventRef>,
    /// False for the leading and trailing days borrowed from adjacent months.
    pub in_month: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MonthView {
    /// First day of the displayed month.
    pub month: NaiveDate,
    pub today: NaiveDate,
    pub cells: Vec<CalendarCell>,
}

/// A session placed on the day timeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PositionedSession {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub column: usize,
    /// Start of the session in fractional hours since midnight.
    pub start: f64,
    pub end: f64,
    pub top: f64,
    pub height: f64,
    pub left_percent: f64,
    pub width_percent: f64,
}

/// A single dated instance of a recurring session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Occurrence {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(days: &[&str], start_date: &str, end_date: &str) -> SessionRecord {
        SessionRecord {
            id: "s1".into(),
            kind: "Course".into(),
            title: "Rust basics".into(),
            session_days: days.iter().map(|day| day.to_string()).collect(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            start_time: "09:00".into(),
            end_time: "10:30".into(),
        }
    }

    #[test]
    fn weekday_set_membership() {
        let set: WeekdaySet = [Weekday::Mon, Weekday::Wed].into_iter().collect();

        assert!(set.contains(Weekday::Mon));
        assert!(set.contains(Weekday::Wed));
        assert!(!set.contains(Weekday::Sun));
        assert_eq!(set.len(), 2);
        assert!(WeekdaySet::empty().is_empty());
    }

    #[test]
    fn schedule_ignores_unknown_weekday_tags() {
        let schedule = record(&["Mon", "Funday"], "2025-01-01", "2025-01-31")
            .schedule()
            .unwrap();

        assert_eq!(schedule.days.len(), 1);
        assert!(schedule.days.contains(Weekday::Mon));
    }

    #[test]
    fn schedule_is_none_for_malformed_dates() {
        assert!(record(&["Mon"], "not a date", "2025-01-31")
            .schedule()
            .is_none());
        assert!(record(&["Mon"], "2025-01-01", "").schedule().is_none());
    }

    #[test]
    fn times_require_increasing_window() {
        let mut session = record(&["Mon"], "2025-01-01", "2025-01-31");
        assert!(session.times().is_some());

        session.end_time = "09:00".into();
        assert!(session.times().is_none());

        session.end_time = "soon".into();
        assert!(session.times().is_none());
    }

    #[test]
    fn times_within_one_minute_are_empty() {
        let mut session = record(&["Mon"], "2025-01-01", "2025-01-31");
        session.start_time = "09:00:10".into();
        session.end_time = "09:00:50".into();

        assert!(session.times().is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_loose_upstream_shape() {
        let session: SessionRecord = serde_json::from_str(
            r#"{
                "_id": "64f0",
                "title": "Mock interviews",
                "sessionDays": ["Tue", "Thu"],
                "startDate": "2025-02-01T00:00:00.000Z",
                "endDate": "2025-03-01",
                "startTime": "18:00",
                "endTime": "19:00",
                "price": 20
            }"#,
        )
        .unwrap();

        assert_eq!(session.id, "64f0");
        assert_eq!(session.kind, "");
        assert_eq!(session.session_days, vec!["Tue", "Thu"]);
        assert!(session.schedule().is_some());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn positioned_session_uses_camel_case() {
        let positioned = PositionedSession {
            id: "a".into(),
            title: "A".into(),
            kind: "Mentorship".into(),
            column: 1,
            start: 9.0,
            end: 10.0,
            top: 432.0,
            height: 48.0,
            left_percent: 50.0,
            width_percent: 50.0,
        };

        let json = serde_json::to_value(&positioned).unwrap();
        assert_eq!(json["leftPercent"], 50.0);
        assert_eq!(json["widthPercent"], 50.0);
    }
}
