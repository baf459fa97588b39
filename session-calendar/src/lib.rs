mod grid;
mod layout;
mod parser;
#[cfg(feature = "serde")]
mod raw;
mod state;
mod structs;

#[cfg(feature = "ics")]
mod ics;

pub use grid::{build_grid, events_for_date, is_active_on, month_view, occurrences};
pub use layout::{
    assign_columns, layout_day, layout_for_date, LayoutConfig, PackingOrder, Placement,
};
pub use parser::{fractional_hours, parse_date, parse_time, parse_weekday};
pub use state::{ModalState, OptimisticFlags, SyncState};
pub use structs::{
    CalendarCell, EventRef, MonthView, Occurrence, PositionedSession, Schedule, SessionRecord,
    WeekdaySet,
};

#[cfg(feature = "ics")]
pub use crate::ics::to_ics;
