use chrono::{Datelike, Days, Months, NaiveDate};

use crate::{CalendarCell, EventRef, MonthView, Occurrence, Schedule, SessionRecord};

/// True iff `date` lies within the session's inclusive date range and falls
/// on one of its weekdays. Malformed records are never active.
pub fn is_active_on(session: &SessionRecord, date: NaiveDate) -> bool {
    session
        .schedule()
        .is_some_and(|schedule| schedule.is_active_on(date))
}

/// Every date shown for the month containing `reference`, from the Sunday on
/// or before the 1st through the Saturday on or after the last day.
pub fn build_grid(reference: NaiveDate) -> Vec<NaiveDate> {
    let first = reference.with_day(1).unwrap_or(reference);
    let last = last_of_month(first);

    let start = first
        .checked_sub_days(Days::new(first.weekday().num_days_from_sunday().into()))
        .unwrap_or(NaiveDate::MIN);
    let end = last
        .checked_add_days(Days::new((6 - last.weekday().num_days_from_sunday()).into()))
        .unwrap_or(NaiveDate::MAX);

    start.iter_days().take_while(|date| *date <= end).collect()
}

pub fn events_for_date(date: NaiveDate, sessions: &[SessionRecord]) -> Vec<EventRef> {
    sessions
        .iter()
        .filter(|session| is_active_on(session, date))
        .map(event_ref)
        .collect()
}

/// Indexes the grid of the month containing `reference`.
///
/// `today` is read once by the caller so every cell agrees on it.
pub fn month_view(reference: NaiveDate, today: NaiveDate, sessions: &[SessionRecord]) -> MonthView {
    let month = reference.with_day(1).unwrap_or(reference);
    let schedules = valid_schedules(sessions);

    let cells = build_grid(reference)
        .into_iter()
        .map(|date| {
            let events = schedules
                .iter()
                .filter(|(_, schedule)| schedule.is_active_on(date))
                .map(|(session, _)| event_ref(session))
                .collect::<Vec<_>>();

            CalendarCell {
                date,
                count: events.len(),
                events,
                in_month: date.year() == month.year() && date.month() == month.month(),
                is_today: date == today,
            }
        })
        .collect();

    MonthView {
        month,
        today,
        cells,
    }
}

/// Expands every well-formed session into its dated instances within
/// `[from, to]`, ordered by date and then by input order.
pub fn occurrences(sessions: &[SessionRecord], from: NaiveDate, to: NaiveDate) -> Vec<Occurrence> {
    let timed = valid_schedules(sessions)
        .into_iter()
        .filter_map(|(session, schedule)| {
            let times = session.times();
            if times.is_none() {
                log::debug!("Skipping session {} with malformed times", session.id);
            }
            times.map(|(start, end)| (session, schedule, start, end))
        })
        .collect::<Vec<_>>();

    let mut found = Vec::new();
    for date in from.iter_days().take_while(|date| *date <= to) {
        for (session, schedule, start, end) in &timed {
            if schedule.is_active_on(date) {
                found.push(Occurrence {
                    id: session.id.clone(),
                    kind: session.kind.clone(),
                    title: session.title.clone(),
                    date,
                    start: *start,
                    end: *end,
                });
            }
        }
    }

    found
}

fn valid_schedules(sessions: &[SessionRecord]) -> Vec<(&SessionRecord, Schedule)> {
    sessions
        .iter()
        .filter_map(|session| {
            let schedule = session.schedule();
            if schedule.is_none() {
                log::debug!("Skipping session {} with malformed dates", session.id);
            }
            schedule.map(|schedule| (session, schedule))
        })
        .collect()
}

fn event_ref(session: &SessionRecord) -> EventRef {
    EventRef {
        id: session.id.clone(),
        kind: session.kind.clone(),
    }
}

fn last_of_month(first: NaiveDate) -> NaiveDate {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
