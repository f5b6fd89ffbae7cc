//! Employee management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::employee::{
        default_scheduled_time, parse_bulk_line, parse_time, BulkImportReport, BulkLineError,
        CreateEmployee, DeletedEmployee, Employee, EmployeeChanges, NewEmployee, UpdateEmployee,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EmployeesService {
    repository: Repository,
}

impl EmployeesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Employee>> {
        self.repository.list_employees().await
    }

    pub async fn get(&self, employee_id: &str) -> AppResult<Employee> {
        self.repository
            .employee(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))
    }

    pub async fn create(&self, data: CreateEmployee) -> AppResult<Employee> {
        let data = data.trimmed();
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let scheduled_time = match data.scheduled_time.as_deref() {
            Some(value) => parse_time(value)?,
            None => default_scheduled_time(),
        };
        let password_hash = match data.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let employee = self
            .repository
            .create_employee(&NewEmployee {
                employee_id: data.employee_id,
                name: data.name,
                email: data.email,
                scheduled_time,
                password_hash,
            })
            .await?;

        tracing::info!("Employee {} created", employee.employee_id);
        Ok(employee)
    }

    pub async fn update(&self, employee_id: &str, data: UpdateEmployee) -> AppResult<Employee> {
        let data = data.trimmed();
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let changes = EmployeeChanges {
            name: data.name,
            email: data.email,
            scheduled_time: data.scheduled_time.as_deref().map(parse_time).transpose()?,
            password_hash: data.password.as_deref().map(hash_password).transpose()?,
        };

        self.repository
            .update_employee(employee_id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))
    }

    /// Import one employee per `ID,Name,Email,Scheduled Time,Password` line.
    ///
    /// Blank lines are skipped. A bad line is reported and the rest still
    /// get imported.
    pub async fn create_many(&self, lines: &str) -> AppResult<BulkImportReport> {
        let mut report = BulkImportReport {
            success: true,
            ..BulkImportReport::default()
        };

        for (index, raw) in lines.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let created = match parse_bulk_line(line) {
                Ok(data) => self.create(data).await,
                Err(e) => Err(e),
            };
            match created {
                Ok(employee) => {
                    report.imported += 1;
                    report.employees.push(employee);
                }
                Err(e) => {
                    tracing::warn!("Bulk import line {} rejected: {}", index + 1, e);
                    report.failed += 1;
                    report.errors.push(BulkLineError {
                        line: index + 1,
                        input: line.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Bulk employee import: {} imported, {} failed",
            report.imported,
            report.failed
        );
        Ok(report)
    }

    /// Delete an employee together with their attendance records
    pub async fn delete(&self, employee_id: &str) -> AppResult<DeletedEmployee> {
        let deleted_records = self
            .repository
            .delete_employee(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

        tracing::info!(
            "Employee {} deleted with {} attendance records",
            employee_id,
            deleted_records
        );

        Ok(DeletedEmployee {
            success: true,
            employee_id: employee_id.to_string(),
            deleted_records,
        })
    }

    /// Check a password against the stored hash
    pub async fn verify_password(&self, employee_id: &str, password: &str) -> AppResult<bool> {
        let employee = self.get(employee_id).await?;
        let Some(ref hash) = employee.password_hash else {
            return Ok(false);
        };
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// Hash a password using Argon2
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
