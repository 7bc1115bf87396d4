//! OpenAPI document for the employee endpoints, served with Swagger UI in
//! development.

use axum::Router;
use platform_api::ErrorBody;
use platform_db::Employee;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::employees::{self, EmployeePayload};

pub const DOCS_PATH: &str = "/swagger";
pub const SPEC_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee service API",
        description = "CRUD and paginated listing over the employee directory."
    ),
    paths(
        employees::list_employees,
        employees::list_paginated,
        employees::get_employee,
        employees::create_employee,
        employees::update_employee,
        employees::delete_employee,
    ),
    components(schemas(Employee, EmployeePayload, ErrorBody)),
    tags((name = "employees", description = "Employee directory"))
)]
pub struct ApiDoc;

/// Swagger UI at [`DOCS_PATH`] backed by the document at [`SPEC_PATH`].
pub fn swagger_ui<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new(DOCS_PATH)
        .url(SPEC_PATH, ApiDoc::openapi())
        .into()
}
