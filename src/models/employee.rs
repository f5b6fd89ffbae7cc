//! Employee model and related types

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Employee record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub employee_id: String,
    pub name: String,
    pub email: Option<String>,
    /// Expected check-in time
    pub scheduled_time: NaiveTime,
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Create employee request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEmployee {
    #[validate(length(min = 1, max = 50, message = "Employee id must be 1-50 characters"))]
    pub employee_id: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: Option<String>,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: Option<String>,
    /// HH:MM, defaults to 09:00
    pub scheduled_time: Option<String>,
}

/// Update employee request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployee {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: Option<String>,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: Option<String>,
    pub scheduled_time: Option<String>,
}

impl CreateEmployee {
    /// Strip surrounding whitespace so length rules apply to what is stored
    pub fn trimmed(self) -> Self {
        Self {
            employee_id: self.employee_id.trim().to_string(),
            name: self.name.trim().to_string(),
            email: trim_optional(self.email),
            password: self.password,
            scheduled_time: trim_optional(self.scheduled_time),
        }
    }
}

impl UpdateEmployee {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            email: trim_optional(self.email),
            password: self.password,
            scheduled_time: trim_optional(self.scheduled_time),
        }
    }
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Values for a new employee row (password already hashed)
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub employee_id: String,
    pub name: String,
    pub email: Option<String>,
    pub scheduled_time: NaiveTime,
    pub password_hash: Option<String>,
}

/// Columns to change on an employee; None leaves the column as is
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub scheduled_time: Option<NaiveTime>,
    pub password_hash: Option<String>,
}

impl EmployeeChanges {
    pub fn apply(&self, employee: &mut Employee) {
        if let Some(ref name) = self.name {
            employee.name = name.clone();
        }
        if let Some(ref email) = self.email {
            employee.email = Some(email.clone());
        }
        if let Some(time) = self.scheduled_time {
            employee.scheduled_time = time;
        }
        if let Some(ref hash) = self.password_hash {
            employee.password_hash = Some(hash.clone());
        }
    }
}

/// Result of deleting an employee
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeletedEmployee {
    pub success: bool,
    pub employee_id: String,
    /// Attendance records removed along with the employee
    pub deleted_records: u64,
}

/// Bulk import request: one `ID,Name,Email,Scheduled Time,Password` per line
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkEmployees {
    pub lines: String,
}

/// A bulk import line that could not be imported
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkLineError {
    /// 1-based line number in the submitted text
    pub line: usize,
    pub input: String,
    pub error: String,
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct BulkImportReport {
    pub success: bool,
    pub imported: usize,
    pub failed: usize,
    pub employees: Vec<Employee>,
    pub errors: Vec<BulkLineError>,
}

/// Parse one bulk line. Empty email, time or password fields mean "not set".
pub fn parse_bulk_line(line: &str) -> AppResult<CreateEmployee> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    let &[employee_id, name, email, scheduled_time, password] = parts.as_slice() else {
        return Err(AppError::Validation(
            "Invalid format, expected: ID,Name,Email,Scheduled Time,Password".to_string(),
        ));
    };
    let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());

    Ok(CreateEmployee {
        employee_id: employee_id.to_string(),
        name: name.to_string(),
        email: optional(email),
        password: optional(password),
        scheduled_time: optional(scheduled_time),
    })
}

pub fn default_scheduled_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Parse HH:MM or HH:MM:SS
pub fn parse_time(value: &str) -> AppResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("Invalid scheduled_time (use HH:MM): {}", value)))
}
