//! Employee management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::employee::{
        BulkEmployees, BulkImportReport, CreateEmployee, DeletedEmployee, Employee, UpdateEmployee,
    },
};

/// List employees
#[utoipa::path(
    get,
    path = "/employees",
    tag = "employees",
    responses(
        (status = 200, description = "All employees", body = Vec<Employee>)
    )
)]
pub async fn list_employees(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Employee>>> {
    let employees = state.services.employees.list().await?;
    Ok(Json(employees))
}

/// Get employee by ID
#[utoipa::path(
    get,
    path = "/employees/{employee_id}",
    tag = "employees",
    params(("employee_id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee details", body = Employee),
        (status = 404, description = "Employee not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_employee(
    State(state): State<crate::AppState>,
    Path(employee_id): Path<String>,
) -> AppResult<Json<Employee>> {
    let employee = state.services.employees.get(&employee_id).await?;
    Ok(Json(employee))
}

/// Create an employee
#[utoipa::path(
    post,
    path = "/employees",
    tag = "employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Employee ID already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_employee(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateEmployee>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    let created = state.services.employees.create(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Import employees from `ID,Name,Email,Scheduled Time,Password` lines
#[utoipa::path(
    post,
    path = "/employees/bulk",
    tag = "employees",
    request_body = BulkEmployees,
    responses(
        (status = 200, description = "Per-line import results", body = BulkImportReport)
    )
)]
pub async fn bulk_create_employees(
    State(state): State<crate::AppState>,
    Json(data): Json<BulkEmployees>,
) -> AppResult<Json<BulkImportReport>> {
    let report = state.services.employees.create_many(&data.lines).await?;
    Ok(Json(report))
}

/// Update an employee
#[utoipa::path(
    put,
    path = "/employees/{employee_id}",
    tag = "employees",
    params(("employee_id" = String, Path, description = "Employee ID")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 404, description = "Employee not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_employee(
    State(state): State<crate::AppState>,
    Path(employee_id): Path<String>,
    Json(data): Json<UpdateEmployee>,
) -> AppResult<Json<Employee>> {
    let updated = state.services.employees.update(&employee_id, data).await?;
    Ok(Json(updated))
}

/// Delete an employee and their attendance records
#[utoipa::path(
    delete,
    path = "/employees/{employee_id}",
    tag = "employees",
    params(("employee_id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deleted", body = DeletedEmployee),
        (status = 404, description = "Employee not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_employee(
    State(state): State<crate::AppState>,
    Path(employee_id): Path<String>,
) -> AppResult<Json<DeletedEmployee>> {
    let deleted = state.services.employees.delete(&employee_id).await?;
    Ok(Json(deleted))
}
