//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{attendance, calendar, employees, events, health, settings};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "1.2.0",
        description = "Employee attendance and working calendar REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Settings
        settings::get_settings,
        settings::update_settings,
        // Calendar
        calendar::get_month,
        calendar::generate_month,
        calendar::regenerate,
        calendar::get_day,
        // Events
        events::list_events,
        events::save_event,
        events::remove_event,
        // Employees
        employees::list_employees,
        employees::get_employee,
        employees::create_employee,
        employees::bulk_create_employees,
        employees::update_employee,
        employees::delete_employee,
        // Attendance
        attendance::check_in,
        attendance::check_out,
        attendance::update_status,
        attendance::list_attendance,
        attendance::pending_approvals,
        attendance::monthly_summary,
        attendance::run_auto_absence,
    ),
    components(
        schemas(
            // Enums
            crate::models::enums::DayType,
            crate::models::enums::ApprovalStatus,
            crate::models::enums::LateStatus,
            // Calendar
            crate::models::settings::WeeklySettings,
            crate::models::calendar::CalendarDay,
            crate::models::calendar::DateEvent,
            crate::models::calendar::SaveDateEvent,
            crate::models::calendar::MonthGeneration,
            crate::models::calendar::HolidayEnforcement,
            crate::models::calendar::SaveEventResult,
            crate::models::calendar::RemoveEventResult,
            crate::models::calendar::ResolutionSource,
            crate::models::calendar::DayResolution,
            crate::services::settings::SettingsSaved,
            calendar::MonthCalendarResponse,
            calendar::RegenerateResponse,
            // Employees
            crate::models::employee::Employee,
            crate::models::employee::CreateEmployee,
            crate::models::employee::UpdateEmployee,
            crate::models::employee::DeletedEmployee,
            crate::models::employee::BulkEmployees,
            crate::models::employee::BulkLineError,
            crate::models::employee::BulkImportReport,
            // Attendance
            crate::models::attendance::AttendanceRecord,
            crate::models::attendance::CheckInRequest,
            crate::models::attendance::CheckOutRequest,
            crate::models::attendance::UpdateStatusRequest,
            crate::models::attendance::AttendanceSummary,
            crate::models::attendance::SweepReport,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "settings", description = "Weekly calendar settings"),
        (name = "calendar", description = "Generated calendar and day resolution"),
        (name = "events", description = "Date-specific calendar overrides"),
        (name = "employees", description = "Employee management"),
        (name = "attendance", description = "Attendance records and auto-absence")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
