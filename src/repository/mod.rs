//! Repository layer for database operations
//!
//! Services talk to persistence through the [`Store`] trait. [`PgStore`] is
//! the PostgreSQL implementation; [`memory::MemoryStore`] keeps everything in
//! process and backs the integration tests.

pub mod attendance;
pub mod calendar;
pub mod employees;
pub mod events;
pub mod memory;
pub mod settings;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        attendance::{AttendanceFilter, InsertOutcome, NewAttendance},
        calendar::{CalendarDay, DateEvent},
        employee::{Employee, EmployeeChanges, NewEmployee},
        enums::{ApprovalStatus, DayType, LateStatus},
        AttendanceRecord,
    },
};

/// Persisted weekday -> day type mapping
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Raw stored values; missing keys are simply absent
    async fn load_weekly_settings(&self) -> AppResult<BTreeMap<String, String>>;
    async fn save_weekly_settings(&self, values: &BTreeMap<String, String>) -> AppResult<()>;
}

/// Generated calendar days
#[async_trait]
pub trait CalendarStore: Send + Sync {
    async fn month_days(&self, year: i32, month: u32) -> AppResult<Vec<CalendarDay>>;
    async fn calendar_day(&self, date: NaiveDate) -> AppResult<Option<CalendarDay>>;

    /// Atomically delete the overrides in `pruned`, delete every row of the
    /// month and insert `days`. Concurrent calls for the same month are
    /// serialized.
    async fn replace_month(
        &self,
        year: i32,
        month: u32,
        days: &[CalendarDay],
        pruned: &[NaiveDate],
    ) -> AppResult<()>;

    /// Update the type and description of an existing row. Returns false
    /// when the day has not been generated.
    async fn update_calendar_day(
        &self,
        date: NaiveDate,
        day_type: DayType,
        description: &str,
    ) -> AppResult<bool>;
}

/// Date-specific overrides
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Events in `[start, end]`, ordered by date
    async fn events_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<DateEvent>>;
    async fn date_event(&self, date: NaiveDate) -> AppResult<Option<DateEvent>>;
    async fn upsert_event(
        &self,
        date: NaiveDate,
        event_type: DayType,
        note: Option<&str>,
    ) -> AppResult<DateEvent>;
    /// Returns true when an event existed
    async fn delete_event(&self, date: NaiveDate) -> AppResult<bool>;
}

/// Attendance ledger
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Insert unless a record already exists for (employee_id, date)
    async fn insert_attendance(&self, record: &NewAttendance) -> AppResult<InsertOutcome>;
    async fn attendance_by_id(&self, id: i64) -> AppResult<Option<AttendanceRecord>>;
    async fn attendance_for(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<AttendanceRecord>>;

    /// Fill in a record that has no check-in yet. None when the record is
    /// missing or already has an in_time.
    async fn fill_check_in(
        &self,
        id: i64,
        in_time: NaiveDateTime,
        late_status: LateStatus,
        late_minutes: i32,
    ) -> AppResult<Option<AttendanceRecord>>;

    /// Set out_time on a record not yet checked out. None when the record is
    /// missing or already checked out.
    async fn set_check_out(
        &self,
        id: i64,
        out_time: NaiveDateTime,
    ) -> AppResult<Option<AttendanceRecord>>;

    async fn set_approval(
        &self,
        id: i64,
        status: ApprovalStatus,
    ) -> AppResult<Option<AttendanceRecord>>;

    /// Records matching the filter, newest date first
    async fn list_attendance(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceRecord>>;

    /// Delete every record for a date, returning the deleted count
    async fn delete_attendance_on(&self, date: NaiveDate) -> AppResult<u64>;

    /// Employees with no record for `date`
    async fn employees_without_record(&self, date: NaiveDate) -> AppResult<Vec<Employee>>;
}

/// Employee registry
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn list_employees(&self) -> AppResult<Vec<Employee>>;
    async fn employee(&self, employee_id: &str) -> AppResult<Option<Employee>>;
    /// Conflict when the employee_id is taken
    async fn create_employee(&self, employee: &NewEmployee) -> AppResult<Employee>;
    async fn update_employee(
        &self,
        employee_id: &str,
        changes: &EmployeeChanges,
    ) -> AppResult<Option<Employee>>;
    /// Delete the employee and their attendance. Returns the number of
    /// attendance records removed, None when the employee does not exist.
    async fn delete_employee(&self, employee_id: &str) -> AppResult<Option<u64>>;
}

/// Everything the services need from persistence
#[async_trait]
pub trait Store: SettingsStore + CalendarStore + EventStore + AttendanceStore + EmployeeStore {
    /// Cheap round trip used by the readiness probe
    async fn ping(&self) -> AppResult<()>;
}

/// Shared handle to the store
pub type Repository = Arc<dyn Store>;

/// PostgreSQL store
#[derive(Clone)]
pub struct PgStore {
    pub pool: Pool<Postgres>,
}

impl PgStore {
    /// Create a new store with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub fn into_repository(self) -> Repository {
        Arc::new(self)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
