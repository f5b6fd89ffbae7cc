//! Attendance endpoints (check-in/out, approvals, reports, sweep)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Datelike;

use crate::{
    error::AppResult,
    models::attendance::{
        AttendanceFilter, AttendanceRecord, AttendanceSummary, CheckInRequest, CheckOutRequest,
        SummaryQuery, SweepReport, UpdateStatusRequest,
    },
};

/// Check in an employee
#[utoipa::path(
    post,
    path = "/attendance/check-in",
    tag = "attendance",
    request_body = CheckInRequest,
    responses(
        (status = 201, description = "Check-in recorded", body = AttendanceRecord),
        (status = 404, description = "Employee not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already checked in", body = crate::error::ErrorResponse),
        (status = 422, description = "Date is a holiday", body = crate::error::ErrorResponse)
    )
)]
pub async fn check_in(
    State(state): State<crate::AppState>,
    Json(request): Json<CheckInRequest>,
) -> AppResult<(StatusCode, Json<AttendanceRecord>)> {
    let now = state.now();
    let in_time = request.in_time.unwrap_or(now);
    let date = request.date.unwrap_or_else(|| in_time.date());

    let record = state
        .services
        .attendance
        .check_in(&request.employee_id, date, in_time)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Check out
#[utoipa::path(
    post,
    path = "/attendance/{id}/check-out",
    tag = "attendance",
    params(("id" = i64, Path, description = "Attendance record ID")),
    request_body = CheckOutRequest,
    responses(
        (status = 200, description = "Check-out recorded", body = AttendanceRecord),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already checked out", body = crate::error::ErrorResponse)
    )
)]
pub async fn check_out(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CheckOutRequest>,
) -> AppResult<Json<AttendanceRecord>> {
    let out_time = request.out_time.unwrap_or_else(|| state.now());
    let record = state.services.attendance.check_out(id, out_time).await?;
    Ok(Json(record))
}

/// Approve or reject a record
#[utoipa::path(
    put,
    path = "/attendance/{id}/status",
    tag = "attendance",
    params(("id" = i64, Path, description = "Attendance record ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = AttendanceRecord),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_status(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> AppResult<Json<AttendanceRecord>> {
    let record = state.services.attendance.set_status(id, request.status).await?;
    Ok(Json(record))
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/attendance",
    tag = "attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Matching records, newest first", body = Vec<AttendanceRecord>)
    )
)]
pub async fn list_attendance(
    State(state): State<crate::AppState>,
    Query(filter): Query<AttendanceFilter>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    let records = state.services.attendance.list(&filter).await?;
    Ok(Json(records))
}

/// Records awaiting approval
#[utoipa::path(
    get,
    path = "/attendance/pending",
    tag = "attendance",
    responses(
        (status = 200, description = "Pending records", body = Vec<AttendanceRecord>)
    )
)]
pub async fn pending_approvals(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    let records = state.services.attendance.pending_approvals().await?;
    Ok(Json(records))
}

/// Monthly counts (defaults to the current month)
#[utoipa::path(
    get,
    path = "/attendance/summary",
    tag = "attendance",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Monthly summary", body = AttendanceSummary)
    )
)]
pub async fn monthly_summary(
    State(state): State<crate::AppState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<AttendanceSummary>> {
    let today = state.today();
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());
    let summary = state.services.attendance.monthly_summary(year, month).await?;
    Ok(Json(summary))
}

/// Run the auto-absence sweep now
#[utoipa::path(
    post,
    path = "/attendance/auto-absence",
    tag = "attendance",
    responses(
        (status = 200, description = "Sweep report", body = SweepReport)
    )
)]
pub async fn run_auto_absence(State(state): State<crate::AppState>) -> AppResult<Json<SweepReport>> {
    let report = state.services.sweep.run_auto_absence(state.now()).await?;
    Ok(Json(report))
}
