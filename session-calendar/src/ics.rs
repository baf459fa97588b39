use std::borrow::Cow;

use chrono::NaiveDate;
use ics::{
    properties::{Categories, DtEnd, DtStart, Summary},
    ICalendar,
};

use crate::{occurrences, Occurrence, SessionRecord};

/// Exports every occurrence within `[from, to]` as floating local times.
#[must_use]
pub fn to_ics<'a, S: Into<Cow<'a, str>>>(
    name: S,
    sessions: &[SessionRecord],
    from: NaiveDate,
    to: NaiveDate,
) -> ICalendar<'a> {
    let mut icalendar = ICalendar::new("2.0", name);

    for occurrence in occurrences(sessions, from, to) {
        icalendar.add_event(occurrence.into());
    }

    icalendar
}

impl<'a> From<Occurrence> for ics::Event<'a> {
    fn from(occurrence: Occurrence) -> ics::Event<'a> {
        let start = format!(
            "{}T{}00",
            occurrence.date.format("%Y%m%d"),
            occurrence.start.format("%H%M")
        );

        let end = format!(
            "{}T{}00",
            occurrence.date.format("%Y%m%d"),
            occurrence.end.format("%H%M")
        );

        let uid = format!("{}_{}", start, occurrence.id.replace(' ', "-"));

        let mut ics_event = ics::Event::new(uid, start.clone());

        ics_event.push(DtStart::new(start));
        ics_event.push(DtEnd::new(end));
        ics_event.push(Summary::new(occurrence.title));

        if !occurrence.kind.is_empty() {
            ics_event.push(Categories::new(occurrence.kind));
        }

        ics_event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_each_occurrence() {
        let sessions = vec![SessionRecord {
            id: "c 1".into(),
            kind: "Course".into(),
            title: "Portfolio review".into(),
            session_days: vec!["Mon".into(), "Wed".into()],
            start_date: "2025-01-01".into(),
            end_date: "2025-01-31".into(),
            start_time: "17:30".into(),
            end_time: "18:15".into(),
        }];

        let from = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        let output = to_ics("mentor", &sessions, from, to).to_string();

        assert_eq!(output.matches("BEGIN:VEVENT").count(), 2);
        assert!(output.contains("DTSTART:20250106T173000"));
        assert!(output.contains("DTEND:20250108T181500"));
        assert!(output.contains("UID:20250106T173000_c-1"));
        assert!(output.contains("SUMMARY:Portfolio review"));
        assert!(output.contains("CATEGORIES:Course"));
    }

    #[test]
    fn empty_range_has_no_events() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let output = to_ics("mentor", &[], day, day).to_string();

        assert!(output.contains("BEGIN:VCALENDAR"));
        assert!(!output.contains("BEGIN:VEVENT"));
    }
}
