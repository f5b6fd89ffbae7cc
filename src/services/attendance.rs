//! Attendance service (check-in/out, approvals, reporting)

use chrono::{NaiveDate, NaiveDateTime};

use super::resolver::DayResolver;
use crate::{
    error::{AppError, AppResult},
    models::{
        attendance::{
            late_minutes, AttendanceFilter, AttendanceRecord, AttendanceSummary, InsertOutcome,
            NewAttendance,
        },
        calendar::month_bounds,
        enums::{ApprovalStatus, LateStatus},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AttendanceService {
    repository: Repository,
    resolver: DayResolver,
}

impl AttendanceService {
    pub fn new(repository: Repository, resolver: DayResolver) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    /// Record a check-in, classified against the employee's scheduled time.
    ///
    /// A sweep-generated absence (no in_time) is filled in and reclassified.
    pub async fn check_in(
        &self,
        employee_id: &str,
        date: NaiveDate,
        in_time: NaiveDateTime,
    ) -> AppResult<AttendanceRecord> {
        let employee = self
            .repository
            .employee(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

        let resolution = self.resolver.is_working_day(date).await?;
        if !resolution.is_working_day {
            tracing::info!("Check-in for {} refused: {} is a holiday", employee_id, date);
            return Err(AppError::BusinessRule(format!(
                "{} is a holiday, attendance cannot be recorded",
                date
            )));
        }

        if let Some(existing) = self.repository.attendance_for(employee_id, date).await? {
            if existing.in_time.is_some() {
                return Err(AppError::Conflict(format!(
                    "Employee {} already checked in on {}",
                    employee_id, date
                )));
            }

            let minutes = late_minutes(date, existing.scheduled_time, in_time);
            let late_status = LateStatus::classify(minutes);
            let record = self
                .repository
                .fill_check_in(
                    existing.id,
                    in_time,
                    late_status,
                    i32::try_from(minutes).unwrap_or(i32::MAX),
                )
                .await?
                .ok_or_else(|| {
                    AppError::Conflict(format!("Employee {} already checked in on {}", employee_id, date))
                })?;
            tracing::info!(
                "Check-in for {} on {} replaced an automatic absence ({}, {} min)",
                employee_id,
                date,
                late_status,
                minutes
            );
            return Ok(record);
        }

        let row = NewAttendance::check_in(
            &employee.employee_id,
            &employee.name,
            date,
            employee.scheduled_time,
            in_time,
        );
        match self.repository.insert_attendance(&row).await? {
            InsertOutcome::Inserted(record) => {
                tracing::info!(
                    "Check-in for {} on {} ({}, {} min late)",
                    employee_id,
                    date,
                    record.late_status,
                    record.late_minutes
                );
                Ok(record)
            }
            InsertOutcome::AlreadyExists => Err(AppError::Conflict(format!(
                "Employee {} already checked in on {}",
                employee_id, date
            ))),
        }
    }

    /// Record a check-out on an existing check-in
    pub async fn check_out(&self, record_id: i64, out_time: NaiveDateTime) -> AppResult<AttendanceRecord> {
        let record = self.get(record_id).await?;

        let Some(in_time) = record.in_time else {
            return Err(AppError::BusinessRule(format!(
                "Attendance record {} has no check-in",
                record_id
            )));
        };
        if record.out_time.is_some() {
            return Err(AppError::Conflict(format!(
                "Attendance record {} is already checked out",
                record_id
            )));
        }
        if out_time < in_time {
            return Err(AppError::Validation(
                "out_time must not be before in_time".to_string(),
            ));
        }

        self.repository
            .set_check_out(record_id, out_time)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!("Attendance record {} is already checked out", record_id))
            })
    }

    /// Approve or reject a record
    pub async fn set_status(&self, record_id: i64, status: ApprovalStatus) -> AppResult<AttendanceRecord> {
        if status == ApprovalStatus::Pending {
            return Err(AppError::Validation(
                "Status must be approved or rejected".to_string(),
            ));
        }
        let record = self
            .repository
            .set_approval(record_id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attendance record {} not found", record_id)))?;
        tracing::info!("Attendance record {} {}", record_id, status);
        Ok(record)
    }

    pub async fn get(&self, record_id: i64) -> AppResult<AttendanceRecord> {
        self.repository
            .attendance_by_id(record_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attendance record {} not found", record_id)))
    }

    /// Records awaiting approval
    pub async fn pending_approvals(&self) -> AppResult<Vec<AttendanceRecord>> {
        self.repository
            .list_attendance(&AttendanceFilter {
                status: Some(ApprovalStatus::Pending),
                ..AttendanceFilter::default()
            })
            .await
    }

    pub async fn list(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceRecord>> {
        match (filter.start_date, filter.end_date) {
            (Some(start), Some(end)) if start > end => Err(AppError::Validation(
                "start_date must not be after end_date".to_string(),
            )),
            (Some(_), None) | (None, Some(_)) => Err(AppError::Validation(
                "start_date and end_date must be given together".to_string(),
            )),
            _ => self.repository.list_attendance(filter).await,
        }
    }

    /// Counts by approval status and punctuality for a month
    pub async fn monthly_summary(&self, year: i32, month: u32) -> AppResult<AttendanceSummary> {
        let (first, last) = month_bounds(year, month)?;
        let records = self
            .repository
            .list_attendance(&AttendanceFilter {
                start_date: Some(first),
                end_date: Some(last),
                ..AttendanceFilter::default()
            })
            .await?;
        Ok(AttendanceSummary::tally(year, month, &records))
    }
}
