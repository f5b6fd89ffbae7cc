//! Date event endpoints (per-date overrides of the weekly calendar)

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::path_date;
use crate::{
    error::AppResult,
    models::calendar::{
        parse_date, DateEvent, EventQuery, RemoveEventResult, SaveDateEvent, SaveEventResult,
    },
};

/// List date events
#[utoipa::path(
    get,
    path = "/calendar/events",
    tag = "events",
    params(EventQuery),
    responses(
        (status = 200, description = "Events ordered by date", body = Vec<DateEvent>)
    )
)]
pub async fn list_events(
    State(state): State<crate::AppState>,
    Query(query): Query<EventQuery>,
) -> AppResult<Json<Vec<DateEvent>>> {
    let start = query
        .start_date
        .as_deref()
        .map(|s| parse_date(s, "start_date"))
        .transpose()?;
    let end = query
        .end_date
        .as_deref()
        .map(|s| parse_date(s, "end_date"))
        .transpose()?;
    let events = state.services.calendar.list_events(start, end).await?;
    Ok(Json(events))
}

/// Save (create or replace) the override for a date
#[utoipa::path(
    put,
    path = "/calendar/events/{date}",
    tag = "events",
    params(("date" = String, Path, description = "Date (YYYY-MM-DD)")),
    request_body = SaveDateEvent,
    responses(
        (status = 200, description = "Event saved", body = SaveEventResult),
        (status = 400, description = "Invalid date or day type", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_event(
    State(state): State<crate::AppState>,
    Path(date): Path<String>,
    Json(data): Json<SaveDateEvent>,
) -> AppResult<Json<SaveEventResult>> {
    let date = path_date(&date)?;
    let result = state
        .services
        .events
        .save_date_event(date, &data.event_type, data.event_note.as_deref())
        .await?;
    Ok(Json(result))
}

/// Remove the override for a date
#[utoipa::path(
    delete,
    path = "/calendar/events/{date}",
    tag = "events",
    params(("date" = String, Path, description = "Date (YYYY-MM-DD)")),
    responses(
        (status = 200, description = "Override removed (or there was none)", body = RemoveEventResult)
    )
)]
pub async fn remove_event(
    State(state): State<crate::AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<RemoveEventResult>> {
    let date = path_date(&date)?;
    let result = state.services.events.remove_date_event(date).await?;
    Ok(Json(result))
}
