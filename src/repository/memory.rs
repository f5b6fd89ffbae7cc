//! In-memory store
//!
//! Same contract as [`PgStore`](super::PgStore). Every operation runs under
//! one async mutex, so replace_month and compare-and-insert are atomic.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use tokio::sync::Mutex;

use super::{
    AttendanceStore, CalendarStore, EmployeeStore, EventStore, Repository, SettingsStore, Store,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        attendance::{AttendanceFilter, AttendanceRecord, InsertOutcome, NewAttendance},
        calendar::{CalendarDay, DateEvent},
        employee::{Employee, EmployeeChanges, NewEmployee},
        enums::{ApprovalStatus, DayType, LateStatus},
    },
};

#[derive(Default)]
struct Tables {
    settings: BTreeMap<String, String>,
    days: BTreeMap<(i32, i32, i32), CalendarDay>,
    events: BTreeMap<NaiveDate, DateEvent>,
    records: BTreeMap<i64, AttendanceRecord>,
    employees: BTreeMap<String, Employee>,
    next_record_id: i64,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_repository(self) -> Repository {
        Arc::new(self)
    }
}

fn day_key(date: NaiveDate) -> (i32, i32, i32) {
    (date.year(), date.month() as i32, date.day() as i32)
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load_weekly_settings(&self) -> AppResult<BTreeMap<String, String>> {
        Ok(self.tables.lock().await.settings.clone())
    }

    async fn save_weekly_settings(&self, values: &BTreeMap<String, String>) -> AppResult<()> {
        self.tables.lock().await.settings = values.clone();
        Ok(())
    }
}

#[async_trait]
impl CalendarStore for MemoryStore {
    async fn month_days(&self, year: i32, month: u32) -> AppResult<Vec<CalendarDay>> {
        let tables = self.tables.lock().await;
        let month = month as i32;
        Ok(tables
            .days
            .range((year, month, 0)..=(year, month, 31))
            .map(|(_, day)| day.clone())
            .collect())
    }

    async fn calendar_day(&self, date: NaiveDate) -> AppResult<Option<CalendarDay>> {
        Ok(self.tables.lock().await.days.get(&day_key(date)).cloned())
    }

    async fn replace_month(
        &self,
        year: i32,
        month: u32,
        days: &[CalendarDay],
        pruned: &[NaiveDate],
    ) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        for date in pruned {
            tables.events.remove(date);
        }
        let month = month as i32;
        tables
            .days
            .retain(|&(y, m, _), _| !(y == year && m == month));
        for day in days {
            tables
                .days
                .insert((day.year, day.month, day.day), day.clone());
        }
        Ok(())
    }

    async fn update_calendar_day(
        &self,
        date: NaiveDate,
        day_type: DayType,
        description: &str,
    ) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.days.get_mut(&day_key(date)) {
            Some(day) => {
                day.day_type = day_type;
                day.description = description.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn events_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<DateEvent>> {
        if start > end {
            return Ok(Vec::new());
        }
        let tables = self.tables.lock().await;
        Ok(tables
            .events
            .range(start..=end)
            .map(|(_, event)| event.clone())
            .collect())
    }

    async fn date_event(&self, date: NaiveDate) -> AppResult<Option<DateEvent>> {
        Ok(self.tables.lock().await.events.get(&date).cloned())
    }

    async fn upsert_event(
        &self,
        date: NaiveDate,
        event_type: DayType,
        note: Option<&str>,
    ) -> AppResult<DateEvent> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let event = tables.events.entry(date).or_insert_with(|| DateEvent {
            event_date: date,
            event_type,
            event_note: None,
            created_at: Some(now),
            updated_at: None,
        });
        event.event_type = event_type;
        event.event_note = note.map(str::to_string);
        event.updated_at = Some(now);
        Ok(event.clone())
    }

    async fn delete_event(&self, date: NaiveDate) -> AppResult<bool> {
        Ok(self.tables.lock().await.events.remove(&date).is_some())
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn insert_attendance(&self, record: &NewAttendance) -> AppResult<InsertOutcome> {
        let mut tables = self.tables.lock().await;
        let exists = tables
            .records
            .values()
            .any(|r| r.employee_id == record.employee_id && r.date == record.date);
        if exists {
            return Ok(InsertOutcome::AlreadyExists);
        }
        if !tables.employees.contains_key(&record.employee_id) {
            return Err(AppError::NotFound(format!(
                "Employee {} not found",
                record.employee_id
            )));
        }

        tables.next_record_id += 1;
        let now = Utc::now();
        let row = AttendanceRecord {
            id: tables.next_record_id,
            employee_id: record.employee_id.clone(),
            employee_name: record.employee_name.clone(),
            date: record.date,
            in_time: record.in_time,
            out_time: None,
            scheduled_time: record.scheduled_time,
            status: record.status,
            late_status: record.late_status,
            late_minutes: record.late_minutes,
            created_at: Some(now),
            updated_at: Some(now),
        };
        tables.records.insert(row.id, row.clone());
        Ok(InsertOutcome::Inserted(row))
    }

    async fn attendance_by_id(&self, id: i64) -> AppResult<Option<AttendanceRecord>> {
        Ok(self.tables.lock().await.records.get(&id).cloned())
    }

    async fn attendance_for(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<AttendanceRecord>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .records
            .values()
            .find(|r| r.employee_id == employee_id && r.date == date)
            .cloned())
    }

    async fn fill_check_in(
        &self,
        id: i64,
        in_time: NaiveDateTime,
        late_status: LateStatus,
        late_minutes: i32,
    ) -> AppResult<Option<AttendanceRecord>> {
        let mut tables = self.tables.lock().await;
        match tables.records.get_mut(&id) {
            Some(record) if record.in_time.is_none() => {
                record.in_time = Some(in_time);
                record.late_status = late_status;
                record.late_minutes = late_minutes;
                record.updated_at = Some(Utc::now());
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn set_check_out(
        &self,
        id: i64,
        out_time: NaiveDateTime,
    ) -> AppResult<Option<AttendanceRecord>> {
        let mut tables = self.tables.lock().await;
        match tables.records.get_mut(&id) {
            Some(record) if record.out_time.is_none() => {
                record.out_time = Some(out_time);
                record.updated_at = Some(Utc::now());
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn set_approval(
        &self,
        id: i64,
        status: ApprovalStatus,
    ) -> AppResult<Option<AttendanceRecord>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.records.get_mut(&id).map(|record| {
            record.status = status;
            record.updated_at = Some(Utc::now());
            record.clone()
        }))
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceRecord>> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<AttendanceRecord> = tables
            .records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| a.employee_id.cmp(&b.employee_id))
        });
        Ok(rows)
    }

    async fn delete_attendance_on(&self, date: NaiveDate) -> AppResult<u64> {
        let mut tables = self.tables.lock().await;
        let before = tables.records.len();
        tables.records.retain(|_, r| r.date != date);
        Ok((before - tables.records.len()) as u64)
    }

    async fn employees_without_record(&self, date: NaiveDate) -> AppResult<Vec<Employee>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .employees
            .values()
            .filter(|e| {
                !tables
                    .records
                    .values()
                    .any(|r| r.employee_id == e.employee_id && r.date == date)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        Ok(self.tables.lock().await.employees.values().cloned().collect())
    }

    async fn employee(&self, employee_id: &str) -> AppResult<Option<Employee>> {
        Ok(self.tables.lock().await.employees.get(employee_id).cloned())
    }

    async fn create_employee(&self, employee: &NewEmployee) -> AppResult<Employee> {
        let mut tables = self.tables.lock().await;
        if tables.employees.contains_key(&employee.employee_id) {
            return Err(AppError::Conflict(format!(
                "Employee {} already exists",
                employee.employee_id
            )));
        }
        let row = Employee {
            employee_id: employee.employee_id.clone(),
            name: employee.name.clone(),
            email: employee.email.clone(),
            scheduled_time: employee.scheduled_time,
            password_hash: employee.password_hash.clone(),
            created_at: Some(Utc::now()),
        };
        tables.employees.insert(row.employee_id.clone(), row.clone());
        Ok(row)
    }

    async fn update_employee(
        &self,
        employee_id: &str,
        changes: &EmployeeChanges,
    ) -> AppResult<Option<Employee>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.employees.get_mut(employee_id).map(|employee| {
            changes.apply(employee);
            employee.clone()
        }))
    }

    async fn delete_employee(&self, employee_id: &str) -> AppResult<Option<u64>> {
        let mut tables = self.tables.lock().await;
        if tables.employees.remove(employee_id).is_none() {
            return Ok(None);
        }
        let before = tables.records.len();
        tables.records.retain(|_, r| r.employee_id != employee_id);
        Ok(Some((before - tables.records.len()) as u64))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
