//! Employee store: the repository contract and its sea-orm implementation.
//!
//! Every operation is one explicit statement against the `employees` table.
//! Rows are converted into owned [`Employee`] snapshots before they leave
//! this module; "not found" is reported as `None`/`false`, never as an error.

use async_trait::async_trait;
use entity::employees;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    DbPool,
    pagination::{PageRequest, PaginatedResult},
};

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 200;
pub const ADDRESS_MAX_LEN: usize = 2000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
}

/// Employee attributes supplied on create; the id is always generated here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
}

impl From<employees::Model> for Employee {
    fn from(model: employees::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            address: model.address,
        }
    }
}

/// Storage failure, distinct from a missing record.
#[derive(Debug, Error)]
#[error("failed to {operation}")]
pub struct RepositoryError {
    operation: &'static str,
    #[source]
    source: DbErr,
}

impl RepositoryError {
    pub fn new(operation: &'static str, source: DbErr) -> Self {
        Self { operation, source }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn list_all(&self) -> RepositoryResult<Vec<Employee>>;

    /// Page of employees ordered by name. Inputs are clamped, see [`PageRequest::new`].
    async fn list_paginated(
        &self,
        page_number: i64,
        page_size: i64,
    ) -> RepositoryResult<PaginatedResult<Employee>>;

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Employee>>;

    async fn create(&self, employee: NewEmployee) -> RepositoryResult<Employee>;

    /// Overwrite name, email and address of the row matching `employee.id`.
    async fn update(&self, employee: Employee) -> RepositoryResult<Option<Employee>>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
}

#[derive(Clone, Debug)]
pub struct SeaOrmEmployeeRepository {
    db: DbPool,
}

impl SeaOrmEmployeeRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

fn store_error(operation: &'static str) -> impl FnOnce(DbErr) -> RepositoryError {
    move |source| {
        error!(error = %source, operation, "employee store failure");
        RepositoryError::new(operation, source)
    }
}

#[async_trait]
impl EmployeeRepository for SeaOrmEmployeeRepository {
    #[instrument(name = "employees.list_all", skip_all)]
    async fn list_all(&self) -> RepositoryResult<Vec<Employee>> {
        let rows = employees::Entity::find()
            .all(&self.db)
            .await
            .map_err(store_error("fetch all employees"))?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    #[instrument(name = "employees.list_paginated", skip(self))]
    async fn list_paginated(
        &self,
        page_number: i64,
        page_size: i64,
    ) -> RepositoryResult<PaginatedResult<Employee>> {
        let page = PageRequest::new(page_number, page_size);

        let total_count = employees::Entity::find()
            .count(&self.db)
            .await
            .map_err(store_error("count employees"))?;

        // Id breaks ties so equal names keep a stable position across pages.
        let rows = employees::Entity::find()
            .order_by_asc(employees::Column::Name)
            .order_by_asc(employees::Column::Id)
            .offset(page.offset())
            .limit(page.page_size())
            .all(&self.db)
            .await
            .map_err(store_error("fetch paginated employees"))?;

        Ok(PaginatedResult::new(
            rows.into_iter().map(Employee::from).collect(),
            total_count,
            page,
        ))
    }

    #[instrument(name = "employees.get_by_id", skip(self))]
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Employee>> {
        let row = employees::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(store_error("fetch employee by id"))?;
        Ok(row.map(Employee::from))
    }

    #[instrument(name = "employees.create", skip_all)]
    async fn create(&self, employee: NewEmployee) -> RepositoryResult<Employee> {
        let created = Employee {
            id: Uuid::new_v4(),
            name: employee.name,
            email: employee.email,
            address: employee.address,
        };
        let row = employees::ActiveModel {
            id: Set(created.id),
            name: Set(created.name.clone()),
            email: Set(created.email.clone()),
            address: Set(created.address.clone()),
        };
        employees::Entity::insert(row)
            .exec_without_returning(&self.db)
            .await
            .map_err(store_error("create employee"))?;
        Ok(created)
    }

    #[instrument(name = "employees.update", skip_all, fields(id = %employee.id))]
    async fn update(&self, employee: Employee) -> RepositoryResult<Option<Employee>> {
        let result = employees::Entity::update_many()
            .col_expr(employees::Column::Name, Expr::value(employee.name.clone()))
            .col_expr(employees::Column::Email, Expr::value(employee.email.clone()))
            .col_expr(
                employees::Column::Address,
                Expr::value(employee.address.clone()),
            )
            .filter(employees::Column::Id.eq(employee.id))
            .exec(&self.db)
            .await
            .map_err(store_error("update employee"))?;
        Ok((result.rows_affected > 0).then_some(employee))
    }

    #[instrument(name = "employees.delete", skip(self))]
    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = employees::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(store_error("delete employee"))?;
        Ok(result.rows_affected > 0)
    }
}
