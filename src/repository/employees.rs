//! Employees repository

use async_trait::async_trait;

use super::{EmployeeStore, PgStore};
use crate::{
    error::{AppError, AppResult},
    models::employee::{Employee, EmployeeChanges, NewEmployee},
};

const EMPLOYEE_COLUMNS: &str = "employee_id, name, email, scheduled_time, password_hash, created_at";

#[async_trait]
impl EmployeeStore for PgStore {
    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees ORDER BY employee_id",
            EMPLOYEE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn employee(&self, employee_id: &str) -> AppResult<Option<Employee>> {
        let row = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees WHERE employee_id = $1",
            EMPLOYEE_COLUMNS
        ))
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_employee(&self, employee: &NewEmployee) -> AppResult<Employee> {
        let result = sqlx::query_as::<_, Employee>(&format!(
            r#"
            INSERT INTO employees (employee_id, name, email, scheduled_time, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        ))
        .bind(&employee.employee_id)
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(employee.scheduled_time)
        .bind(&employee.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                Err(AppError::Conflict(format!(
                    "Employee {} already exists",
                    employee.employee_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_employee(
        &self,
        employee_id: &str,
        changes: &EmployeeChanges,
    ) -> AppResult<Option<Employee>> {
        let row = sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE employees SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                scheduled_time = COALESCE($4, scheduled_time),
                password_hash = COALESCE($5, password_hash)
            WHERE employee_id = $1
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        ))
        .bind(employee_id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(changes.scheduled_time)
        .bind(&changes.password_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_employee(&self, employee_id: &str) -> AppResult<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        let records = sqlx::query("DELETE FROM attendance_records WHERE employee_id = $1")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM employees WHERE employee_id = $1")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(records))
    }
}
