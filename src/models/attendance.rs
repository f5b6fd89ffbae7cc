//! Attendance records, check-in/out requests and lateness classification

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::{ApprovalStatus, LateStatus};

/// Minutes late at which a check-in counts as late
pub const LATE_AFTER_MINUTES: i64 = 120;
/// Minutes late at which a check-in counts as absent
pub const ABSENT_AFTER_MINUTES: i64 = 180;
/// Hours after the scheduled time before the sweep marks an absence
pub const ABSENCE_CUTOFF_HOURS: i64 = 4;
/// late_minutes stored on sweep-generated absences
pub const AUTO_ABSENCE_LATE_MINUTES: i32 = 240;

impl LateStatus {
    pub fn classify(late_minutes: i64) -> Self {
        if late_minutes >= ABSENT_AFTER_MINUTES {
            LateStatus::Absent
        } else if late_minutes >= LATE_AFTER_MINUTES {
            LateStatus::Late
        } else {
            LateStatus::OnTime
        }
    }
}

/// Whole minutes between the scheduled start and the check-in, never negative
pub fn late_minutes(date: NaiveDate, scheduled_time: NaiveTime, in_time: NaiveDateTime) -> i64 {
    (in_time - date.and_time(scheduled_time)).num_minutes().max(0)
}

/// Persistent attendance record (one per employee per day)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: i64,
    pub employee_id: String,
    pub employee_name: String,
    pub date: NaiveDate,
    pub in_time: Option<NaiveDateTime>,
    pub out_time: Option<NaiveDateTime>,
    pub scheduled_time: NaiveTime,
    pub status: ApprovalStatus,
    pub late_status: LateStatus,
    pub late_minutes: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Values for a new attendance row
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub employee_id: String,
    pub employee_name: String,
    pub date: NaiveDate,
    pub in_time: Option<NaiveDateTime>,
    pub scheduled_time: NaiveTime,
    pub status: ApprovalStatus,
    pub late_status: LateStatus,
    pub late_minutes: i32,
}

impl NewAttendance {
    /// Check-in row classified against the scheduled time
    pub fn check_in(
        employee_id: &str,
        employee_name: &str,
        date: NaiveDate,
        scheduled_time: NaiveTime,
        in_time: NaiveDateTime,
    ) -> Self {
        let minutes = late_minutes(date, scheduled_time, in_time);
        Self {
            employee_id: employee_id.to_string(),
            employee_name: employee_name.to_string(),
            date,
            in_time: Some(in_time),
            scheduled_time,
            status: ApprovalStatus::Pending,
            late_status: LateStatus::classify(minutes),
            late_minutes: i32::try_from(minutes).unwrap_or(i32::MAX),
        }
    }

    /// Absence row written by the sweep
    pub fn auto_absence(
        employee_id: &str,
        employee_name: &str,
        date: NaiveDate,
        scheduled_time: NaiveTime,
    ) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            employee_name: employee_name.to_string(),
            date,
            in_time: None,
            scheduled_time,
            status: ApprovalStatus::Pending,
            late_status: LateStatus::classify(AUTO_ABSENCE_LATE_MINUTES as i64),
            late_minutes: AUTO_ABSENCE_LATE_MINUTES,
        }
    }
}

/// Outcome of a compare-and-insert on (employee_id, date)
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    Inserted(AttendanceRecord),
    /// A record for that employee and date already exists
    AlreadyExists,
}

/// Attendance listing filters
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    /// Exact date
    pub date: Option<NaiveDate>,
    pub employee_id: Option<String>,
    pub status: Option<ApprovalStatus>,
    /// Range start (inclusive, needs end_date)
    pub start_date: Option<NaiveDate>,
    /// Range end (inclusive, needs start_date)
    pub end_date: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        if self.date.is_some_and(|d| d != record.date) {
            return false;
        }
        if self
            .employee_id
            .as_ref()
            .is_some_and(|id| *id != record.employee_id)
        {
            return false;
        }
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if record.date < start || record.date > end {
                return false;
            }
        }
        true
    }
}

/// Check-in request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckInRequest {
    pub employee_id: String,
    /// Attendance date, defaults to today
    pub date: Option<NaiveDate>,
    /// Check-in timestamp, defaults to now
    pub in_time: Option<NaiveDateTime>,
}

/// Check-out request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckOutRequest {
    /// Check-out timestamp, defaults to now
    pub out_time: Option<NaiveDateTime>,
}

/// Approve or reject a record
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: ApprovalStatus,
}

/// Monthly summary query
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SummaryQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Counts of records for a month
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceSummary {
    pub year: i32,
    pub month: u32,
    pub total_records: i64,
    pub approved: i64,
    pub rejected: i64,
    pub pending: i64,
    pub on_time_count: i64,
    pub late_count: i64,
    pub absent_count: i64,
}

impl AttendanceSummary {
    pub fn tally(year: i32, month: u32, records: &[AttendanceRecord]) -> Self {
        let mut summary = Self {
            year,
            month,
            ..Self::default()
        };
        for record in records {
            summary.total_records += 1;
            match record.status {
                ApprovalStatus::Approved => summary.approved += 1,
                ApprovalStatus::Rejected => summary.rejected += 1,
                ApprovalStatus::Pending => summary.pending += 1,
            }
            match record.late_status {
                LateStatus::OnTime => summary.on_time_count += 1,
                LateStatus::Late => summary.late_count += 1,
                LateStatus::Absent => summary.absent_count += 1,
            }
        }
        summary
    }
}

/// Summary of one auto-absence sweep run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SweepReport {
    pub success: bool,
    pub date: Option<NaiveDate>,
    /// Employees without a record when the run started
    pub candidates: usize,
    /// Newly inserted absence records
    pub marked: usize,
    /// Skipped because their cutoff has not passed yet
    pub before_cutoff: usize,
    /// Skipped because a record appeared in the meantime
    pub already_recorded: usize,
    /// Skipped because the date resolves as a holiday
    pub holiday: bool,
    pub failed: usize,
}
