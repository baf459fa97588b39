use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use session_calendar::{
    build_grid, layout_for_date, month_view, parse_date, to_ics, LayoutConfig, PositionedSession,
    SessionRecord,
};

use crate::cache::TtlCache;
use crate::error::ProxyError;
use crate::upstream::Upstream;

pub struct AppState {
    pub upstream: Upstream,
    pub cache: Arc<TtlCache<String, Vec<SessionRecord>>>,
    pub layout: LayoutConfig,
}

type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/mentors/:mentor/calendar", get(handle_calendar))
        .route("/mentors/:mentor/day", get(handle_day))
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found") })
        .with_state(state)
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Format {
    #[default]
    Json,
    Ics,
}

#[derive(Deserialize)]
struct CalendarQuery {
    /// `YYYY-MM`, the current month when absent.
    month: Option<String>,
    #[serde(default)]
    format: Format,
}

#[derive(Deserialize)]
struct DayQuery {
    date: String,
}

#[derive(Serialize)]
struct DayResponse {
    date: NaiveDate,
    sessions: Vec<PositionedSession>,
}

async fn handle_calendar(
    State(state): State<SharedState>,
    Path(mentor): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<Response, ProxyError> {
    let today = Local::now().date_naive();
    let reference = match &query.month {
        Some(month) => parse_month(month)?,
        None => today,
    };

    let sessions = mentor_sessions(&state, mentor.clone()).await?;

    if query.format == Format::Ics {
        let grid = build_grid(reference);
        let (Some(&from), Some(&to)) = (grid.first(), grid.last()) else {
            return Ok(StatusCode::NO_CONTENT.into_response());
        };

        return Ok((
            [("content-type", "text/calendar")],
            to_ics(mentor, &sessions, from, to).to_string(),
        )
            .into_response());
    }

    Ok(Json(month_view(reference, today, &sessions)).into_response())
}

async fn handle_day(
    State(state): State<SharedState>,
    Path(mentor): Path<String>,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayResponse>, ProxyError> {
    let date = parse_date(&query.date)
        .ok_or_else(|| ProxyError::InvalidQuery(format!("unrecognised date {:?}", query.date)))?;

    let sessions = mentor_sessions(&state, mentor).await?;

    Ok(Json(DayResponse {
        date,
        sessions: layout_for_date(date, &sessions, &state.layout),
    }))
}

async fn mentor_sessions(
    state: &AppState,
    mentor: String,
) -> Result<Arc<Vec<SessionRecord>>, ProxyError> {
    if let Some(sessions) = state.cache.get(&mentor).await {
        return Ok(sessions);
    }

    let sessions = state.upstream.mentor_sessions(&mentor).await?;
    log::info!("Fetched {} sessions for mentor {mentor}", sessions.len());

    Ok(state.cache.insert(mentor, sessions).await)
}

fn parse_month(raw: &str) -> Result<NaiveDate, ProxyError> {
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .map_err(|_| ProxyError::InvalidQuery(format!("month must be YYYY-MM, got {raw:?}")))
}
