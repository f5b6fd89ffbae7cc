//! Attendance records repository

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use super::{AttendanceStore, PgStore};
use crate::{
    error::AppResult,
    models::{
        attendance::{AttendanceFilter, AttendanceRecord, InsertOutcome, NewAttendance},
        employee::Employee,
        enums::{ApprovalStatus, LateStatus},
    },
};

#[async_trait]
impl AttendanceStore for PgStore {
    async fn insert_attendance(&self, record: &NewAttendance) -> AppResult<InsertOutcome> {
        let row = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO attendance_records (
                employee_id, employee_name, date, in_time, scheduled_time,
                status, late_status, late_minutes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (employee_id, date) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&record.employee_id)
        .bind(&record.employee_name)
        .bind(record.date)
        .bind(record.in_time)
        .bind(record.scheduled_time)
        .bind(record.status)
        .bind(record.late_status)
        .bind(record.late_minutes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some(row) => InsertOutcome::Inserted(row),
            None => InsertOutcome::AlreadyExists,
        })
    }

    async fn attendance_by_id(&self, id: i64) -> AppResult<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRecord>("SELECT * FROM attendance_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn attendance_for(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRecord>(
            "SELECT * FROM attendance_records WHERE employee_id = $1 AND date = $2",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn fill_check_in(
        &self,
        id: i64,
        in_time: NaiveDateTime,
        late_status: LateStatus,
        late_minutes: i32,
    ) -> AppResult<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            UPDATE attendance_records
            SET in_time = $2, late_status = $3, late_minutes = $4, updated_at = NOW()
            WHERE id = $1 AND in_time IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(in_time)
        .bind(late_status)
        .bind(late_minutes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_check_out(
        &self,
        id: i64,
        out_time: NaiveDateTime,
    ) -> AppResult<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            UPDATE attendance_records
            SET out_time = $2, updated_at = NOW()
            WHERE id = $1 AND out_time IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(out_time)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_approval(
        &self,
        id: i64,
        status: ApprovalStatus,
    ) -> AppResult<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRecord>(
            "UPDATE attendance_records SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceRecord>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if filter.date.is_some() {
            conditions.push(format!("date = ${}", idx));
            idx += 1;
        }
        if filter.employee_id.is_some() {
            conditions.push(format!("employee_id = ${}", idx));
            idx += 1;
        }
        if filter.status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }
        let range = filter.start_date.zip(filter.end_date);
        if range.is_some() {
            conditions.push(format!("date BETWEEN ${} AND ${}", idx, idx + 1));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let select_q = format!(
            "SELECT * FROM attendance_records {} ORDER BY date DESC, employee_id",
            where_clause
        );
        let mut builder = sqlx::query_as::<_, AttendanceRecord>(&select_q);
        if let Some(date) = filter.date { builder = builder.bind(date); }
        if let Some(ref employee_id) = filter.employee_id { builder = builder.bind(employee_id); }
        if let Some(status) = filter.status { builder = builder.bind(status); }
        if let Some((start, end)) = range { builder = builder.bind(start).bind(end); }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn delete_attendance_on(&self, date: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM attendance_records WHERE date = $1")
            .bind(date)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn employees_without_record(&self, date: NaiveDate) -> AppResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, Employee>(
            r#"
            SELECT e.employee_id, e.name, e.email, e.scheduled_time, e.password_hash, e.created_at
            FROM employees e
            WHERE NOT EXISTS (
                SELECT 1 FROM attendance_records a
                WHERE a.employee_id = e.employee_id AND a.date = $1
            )
            ORDER BY e.employee_id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
