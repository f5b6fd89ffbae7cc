//! Calendar models (generated days, date overrides, resolution results)

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::{weekday_label, DayType};
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// CalendarDay
// ---------------------------------------------------------------------------

/// One generated day of the working calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CalendarDay {
    pub year: i32,
    /// Month (1-12)
    pub month: i32,
    /// Day of month (1-31)
    pub day: i32,
    pub day_type: DayType,
    pub description: String,
}

impl CalendarDay {
    pub fn new(date: NaiveDate, day_type: DayType, description: String) -> Self {
        Self {
            year: date.year(),
            month: date.month() as i32,
            day: date.day() as i32,
            day_type,
            description,
        }
    }
}

/// "Saturday - Holiday"
pub fn default_description(date: NaiveDate, day_type: DayType) -> String {
    format!("{} - {}", weekday_label(date.weekday()), day_type.label())
}

/// Description for an override saved without a note
pub fn custom_description(day_type: DayType) -> String {
    format!("Custom: {}", day_type.label())
}

pub const HOLIDAY_ENFORCED_DESCRIPTION: &str = "Holiday - Attendance blocked";

/// Longest accepted event note; the note becomes the day's description
pub const MAX_EVENT_NOTE_CHARS: usize = 255;

// ---------------------------------------------------------------------------
// DateEvent
// ---------------------------------------------------------------------------

/// An explicit override of the weekday default for one date
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DateEvent {
    pub event_date: NaiveDate,
    pub event_type: DayType,
    pub event_note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Save date event request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveDateEvent {
    /// working, holiday, half_day or special
    pub event_type: String,
    pub event_note: Option<String>,
}

/// Query parameters for date events
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EventQuery {
    /// Filter events from this date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Filter events until this date (YYYY-MM-DD)
    pub end_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Operation results
// ---------------------------------------------------------------------------

/// Result of generating one month
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthGeneration {
    pub success: bool,
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
    /// Overrides deleted because they matched the weekday default
    pub pruned_events: Vec<NaiveDate>,
}

/// Outcome of deleting attendance for a newly declared holiday
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HolidayEnforcement {
    pub date: NaiveDate,
    pub deleted_records: u64,
    pub message: String,
}

/// Result of saving a date event
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SaveEventResult {
    pub success: bool,
    pub message: String,
    /// None when the override matched the weekday default and was pruned
    pub event: Option<DateEvent>,
    pub calendar_day: Option<CalendarDay>,
    pub enforcement: Option<HolidayEnforcement>,
}

/// Result of removing a date event
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RemoveEventResult {
    pub success: bool,
    pub date: NaiveDate,
    /// Whether an override existed
    pub removed: bool,
    /// Weekday default now in effect
    pub day_type: DayType,
}

/// Where a day's classification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Calendar,
    Event,
    WeeklyDefault,
}

/// Working-day decision for a date
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayResolution {
    pub success: bool,
    pub date: NaiveDate,
    pub is_working_day: bool,
    pub day_type: DayType,
    pub source: ResolutionSource,
}

impl DayResolution {
    pub fn new(date: NaiveDate, day_type: DayType, source: ResolutionSource) -> Self {
        Self {
            success: true,
            date,
            is_working_day: day_type.allows_attendance(),
            day_type,
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Date helpers
// ---------------------------------------------------------------------------

/// Parse a YYYY-MM-DD date
pub fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} (use YYYY-MM-DD): {}", field, value)))
}

/// First and last day of a month
pub fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Validation(format!("Invalid month {}-{}", year, month)))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| AppError::Validation(format!("Invalid month {}-{}", year, month)))?;
    Ok((first, last))
}
