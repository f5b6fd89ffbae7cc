//! Calendar endpoints (month views, generation, day resolution)

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::path_date;
use crate::{
    error::AppResult,
    models::calendar::{CalendarDay, DayResolution, MonthGeneration},
};

/// Month calendar response
#[derive(Serialize, ToSchema)]
pub struct MonthCalendarResponse {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

/// Regeneration response
#[derive(Serialize, ToSchema)]
pub struct RegenerateResponse {
    pub success: bool,
    pub regenerated_months: Vec<String>,
}

/// Get a month's calendar, generating it when missing
#[utoipa::path(
    get,
    path = "/calendar/months/{year}/{month}",
    tag = "calendar",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month (1-12)")
    ),
    responses(
        (status = 200, description = "Calendar days of the month", body = MonthCalendarResponse),
        (status = 400, description = "Invalid month", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_month(
    State(state): State<crate::AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> AppResult<Json<MonthCalendarResponse>> {
    let days = state.services.calendar.month_calendar(year, month).await?;
    Ok(Json(MonthCalendarResponse { year, month, days }))
}

/// Regenerate a month from weekly settings and overrides
#[utoipa::path(
    post,
    path = "/calendar/months/{year}/{month}/generate",
    tag = "calendar",
    params(
        ("year" = i32, Path, description = "Year"),
        ("month" = u32, Path, description = "Month (1-12)")
    ),
    responses(
        (status = 200, description = "Month generated", body = MonthGeneration),
        (status = 400, description = "Invalid month", body = crate::error::ErrorResponse)
    )
)]
pub async fn generate_month(
    State(state): State<crate::AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> AppResult<Json<MonthGeneration>> {
    let generated = state.services.calendar.generate_month(year, month).await?;
    Ok(Json(generated))
}

/// Regenerate every month of the current and next year
#[utoipa::path(
    post,
    path = "/calendar/regenerate",
    tag = "calendar",
    responses(
        (status = 200, description = "Months regenerated", body = RegenerateResponse)
    )
)]
pub async fn regenerate(State(state): State<crate::AppState>) -> AppResult<Json<RegenerateResponse>> {
    let regenerated_months = state.services.calendar.regenerate_years(state.today()).await?;
    Ok(Json(RegenerateResponse {
        success: true,
        regenerated_months,
    }))
}

/// Is attendance allowed on a date?
#[utoipa::path(
    get,
    path = "/calendar/days/{date}",
    tag = "calendar",
    params(("date" = String, Path, description = "Date (YYYY-MM-DD)")),
    responses(
        (status = 200, description = "Working-day decision", body = DayResolution),
        (status = 400, description = "Malformed date", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_day(
    State(state): State<crate::AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<DayResolution>> {
    let date = path_date(&date)?;
    let resolution = state.services.resolver.is_working_day(date).await?;
    Ok(Json(resolution))
}
