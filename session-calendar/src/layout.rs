use std::borrow::Cow;

use chrono::NaiveDate;

use crate::parser::fractional_hours;
use crate::{is_active_on, PositionedSession, SessionRecord};

/// Order in which sessions are offered to the column packer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PackingOrder {
    /// Sessions are packed in the order they were supplied.
    #[default]
    Input,
    /// Sessions are stably sorted by start time before packing.
    Chronological,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Pixels per hour of the day timeline.
    pub hour_height: f64,
    pub order: PackingOrder,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            hour_height: 48.0,
            order: PackingOrder::Input,
        }
    }
}

/// Column assigned to one session, referring back to its input position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub index: usize,
    pub column: usize,
    pub start: f64,
    pub end: f64,
}

impl Placement {
    /// Half-open: touching at a boundary is not an overlap.
    fn overlaps(&self, other: &Placement) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Greedy first-fit packing of sessions into columns, in input order.
///
/// Sessions whose times are missing, malformed or not increasing are left
/// out of the result.
pub fn assign_columns(sessions: &[SessionRecord]) -> Vec<Placement> {
    let mut placed: Vec<Placement> = Vec::with_capacity(sessions.len());

    for (index, session) in sessions.iter().enumerate() {
        let Some((start, end)) = session.times() else {
            log::debug!("Leaving session {} out of the day layout", session.id);
            continue;
        };

        let mut candidate = Placement {
            index,
            column: 0,
            start: fractional_hours(start),
            end: fractional_hours(end),
        };

        while placed
            .iter()
            .any(|other| other.column == candidate.column && other.overlaps(&candidate))
        {
            candidate.column += 1;
        }

        placed.push(candidate);
    }

    placed
}

/// Positions the sessions of one day on the timeline.
///
/// The width of each session is shared with the widest column among the
/// sessions it overlaps, so separate clusters on the same day may be split
/// into a different number of columns.
pub fn layout_day(sessions: &[SessionRecord], config: &LayoutConfig) -> Vec<PositionedSession> {
    let ordered: Cow<'_, [SessionRecord]> = match config.order {
        PackingOrder::Input => Cow::Borrowed(sessions),
        PackingOrder::Chronological => {
            let mut keyed = sessions
                .iter()
                .map(|session| (session.times().map(|(start, _)| start), session))
                .collect::<Vec<_>>();
            keyed.sort_by_key(|(start, _)| *start);
            Cow::Owned(keyed.into_iter().map(|(_, session)| session.clone()).collect())
        }
    };

    let placed = assign_columns(&ordered);

    placed
        .iter()
        .map(|placement| {
            let columns = 1 + placed
                .iter()
                .filter(|other| other.overlaps(placement))
                .map(|other| other.column)
                .max()
                .unwrap_or(placement.column);

            let width_percent = 100.0 / columns as f64;
            let session = &ordered[placement.index];

            PositionedSession {
                id: session.id.clone(),
                title: session.title.clone(),
                kind: session.kind.clone(),
                column: placement.column,
                start: placement.start,
                end: placement.end,
                top: placement.start * config.hour_height,
                height: (placement.end - placement.start) * config.hour_height,
                left_percent: placement.column as f64 * width_percent,
                width_percent,
            }
        })
        .collect()
}

/// Lays out every session active on `date`.
pub fn layout_for_date(
    date: NaiveDate,
    sessions: &[SessionRecord],
    config: &LayoutConfig,
) -> Vec<PositionedSession> {
    let active = sessions
        .iter()
        .filter(|session| is_active_on(session, date))
        .cloned()
        .collect::<Vec<_>>();

    layout_day(&active, config)
}
