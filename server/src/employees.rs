//! `/api/employee` endpoints: request validation, store calls and status mapping.

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use platform_api::{ApiError, ApiResult, ErrorBody};
use platform_db::{
    Employee, NewEmployee, PaginatedResult,
    employees::{ADDRESS_MAX_LEN, EMAIL_MAX_LEN, NAME_MAX_LEN},
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::http::AppState;

pub const BASE_PATH: &str = "/api/employee";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/GetPaginated", get(list_paginated))
        .route(
            "/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

/// Request body for create and update. Any `id` in the body is ignored.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeePayload {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    platform_db::DEFAULT_PAGE_SIZE as i64
}

#[utoipa::path(
    get,
    path = "/api/employee",
    responses(
        (status = 200, description = "Every employee", body = [Employee]),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "employees",
    operation_id = "getAllEmployees"
)]
#[instrument(name = "http.employees.list", skip_all)]
pub(crate) async fn list_employees(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Employee>>> {
    let employees = state
        .employees
        .list_all()
        .await
        .context("fetching all employees")?;
    Ok(Json(employees))
}

#[utoipa::path(
    get,
    path = "/api/employee/GetPaginated",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of employees ordered by name", body = PaginatedResult<Employee>),
        (status = 400, description = "Non-integer query value"),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "employees",
    operation_id = "getPaginatedEmployees"
)]
#[instrument(name = "http.employees.paginated", skip(state))]
pub(crate) async fn list_paginated(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<PaginatedResult<Employee>>> {
    let page = state
        .employees
        .list_paginated(query.page_number, query.page_size)
        .await
        .context("fetching paginated employees")?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/employee/{id}",
    params(("id" = Uuid, Path, description = "Employee id")),
    responses(
        (status = 200, description = "The employee", body = Employee),
        (status = 400, description = "Malformed id"),
        (status = 500, description = "Unknown id (`NOT_FOUND`) or store failure", body = ErrorBody)
    ),
    tag = "employees",
    operation_id = "getEmployeeById"
)]
#[instrument(name = "http.employees.get", skip(state))]
pub(crate) async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Employee>> {
    state
        .employees
        .get_by_id(id)
        .await
        .with_context(|| format!("fetching employee {id}"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Unable to find employee by id."))
}

#[utoipa::path(
    post,
    path = "/api/employee",
    request_body = EmployeePayload,
    responses(
        (status = 201, description = "Employee created", body = Employee,
            headers(("Location" = String, description = "URL of the new employee"))),
        (status = 400, description = "Missing or oversized field", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "employees",
    operation_id = "createEmployee"
)]
#[instrument(name = "http.employees.create", skip_all)]
pub(crate) async fn create_employee(
    State(state): State<AppState>,
    Json(payload): Json<EmployeePayload>,
) -> ApiResult<impl IntoResponse> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::invalid_input("Employee Name cannot be empty."));
    }
    if payload.email.trim().is_empty() {
        return Err(ApiError::invalid_input("Employee Email cannot be empty."));
    }
    check_lengths(&payload)?;

    let created = state
        .employees
        .create(NewEmployee {
            name: payload.name,
            email: payload.email,
            address: payload.address,
        })
        .await
        .context("creating employee")?;
    let location = format!("{BASE_PATH}/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

#[utoipa::path(
    put,
    path = "/api/employee/{id}",
    params(("id" = Uuid, Path, description = "Employee id; any id in the body is ignored")),
    request_body = EmployeePayload,
    responses(
        (status = 200, description = "Employee updated"),
        (status = 400, description = "Nil id or oversized field", body = ErrorBody),
        (status = 500, description = "Unknown id (`NOT_FOUND`) or store failure", body = ErrorBody)
    ),
    tag = "employees",
    operation_id = "updateEmployee"
)]
#[instrument(name = "http.employees.update", skip(state, payload))]
pub(crate) async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmployeePayload>,
) -> ApiResult<StatusCode> {
    if id.is_nil() {
        return Err(ApiError::invalid_input("Invalid employee ID."));
    }
    check_lengths(&payload)?;

    let updated = state
        .employees
        .update(Employee {
            id,
            name: payload.name,
            email: payload.email,
            address: payload.address,
        })
        .await
        .with_context(|| format!("updating employee {id}"))?;
    match updated {
        Some(_) => Ok(StatusCode::OK),
        None => Err(ApiError::not_found("Unable to find employee to update.")),
    }
}

#[utoipa::path(
    delete,
    path = "/api/employee/{id}",
    params(("id" = Uuid, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 400, description = "Nil id", body = ErrorBody),
        (status = 500, description = "Unknown id (`NOT_FOUND`) or store failure", body = ErrorBody)
    ),
    tag = "employees",
    operation_id = "deleteEmployee"
)]
#[instrument(name = "http.employees.delete", skip(state))]
pub(crate) async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if id.is_nil() {
        return Err(ApiError::invalid_input("Invalid employee ID."));
    }
    let deleted = state
        .employees
        .delete(id)
        .await
        .with_context(|| format!("deleting employee {id}"))?;
    if deleted {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::not_found("Unable to find employee to delete."))
    }
}

fn check_lengths(payload: &EmployeePayload) -> ApiResult<()> {
    let too_long = |value: &str, max: usize| value.chars().count() > max;
    if too_long(&payload.name, NAME_MAX_LEN) {
        return Err(ApiError::invalid_input(format!(
            "Employee Name cannot exceed {NAME_MAX_LEN} characters."
        )));
    }
    if too_long(&payload.email, EMAIL_MAX_LEN) {
        return Err(ApiError::invalid_input(format!(
            "Employee Email cannot exceed {EMAIL_MAX_LEN} characters."
        )));
    }
    if payload
        .address
        .as_deref()
        .is_some_and(|address| too_long(address, ADDRESS_MAX_LEN))
    {
        return Err(ApiError::invalid_input(format!(
            "Employee Address cannot exceed {ADDRESS_MAX_LEN} characters."
        )));
    }
    Ok(())
}
