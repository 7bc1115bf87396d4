//! Fakes and helpers shared by the router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Response};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use platform_db::{
    DatabaseSettings, DbPool, Employee, EmployeeRepository, NewEmployee, PageRequest,
    PaginatedResult, RepositoryError, RepositoryResult, SeaOrmEmployeeRepository,
};
use sea_orm::DbErr;
use serde_json::Value;
use uuid::Uuid;

use crate::{config::AppConfig, http::AppState};

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn memory_pool() -> DbPool {
    let mut settings = DatabaseSettings::new("sqlite::memory:");
    // Each SQLite memory connection is its own database.
    settings.max_connections = 1;
    platform_db::connect(&settings).await.unwrap()
}

fn test_config(app_env: &str) -> Arc<AppConfig> {
    let config = AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "APP_ENV" => Some(app_env.to_string()),
        _ => None,
    })
    .unwrap();
    Arc::new(config)
}

pub async fn state_with(employees: Arc<dyn EmployeeRepository>) -> AppState {
    state_with_env(employees, "test").await
}

pub async fn state_with_env(employees: Arc<dyn EmployeeRepository>, app_env: &str) -> AppState {
    AppState {
        pool: memory_pool().await,
        employees,
        config: test_config(app_env),
    }
}

/// State backed by the real store over a migrated in-memory database.
pub async fn migrated_state() -> AppState {
    let pool = memory_pool().await;
    Migrator::up(&pool, None).await.unwrap();
    AppState {
        employees: Arc::new(SeaOrmEmployeeRepository::new(pool.clone())),
        pool,
        config: test_config("test"),
    }
}

#[derive(Default)]
pub struct InMemoryEmployees {
    rows: Mutex<Vec<Employee>>,
    last_page: Mutex<Option<(i64, i64)>>,
}

impl InMemoryEmployees {
    pub fn insert(&self, name: &str, email: &str) -> Employee {
        let employee = Employee {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            address: None,
        };
        self.rows.lock().unwrap().push(employee.clone());
        employee
    }

    pub fn snapshot(&self) -> Vec<Employee> {
        self.rows.lock().unwrap().clone()
    }

    pub fn last_page_request(&self) -> Option<(i64, i64)> {
        *self.last_page.lock().unwrap()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployees {
    async fn list_all(&self) -> RepositoryResult<Vec<Employee>> {
        Ok(self.snapshot())
    }

    async fn list_paginated(
        &self,
        page_number: i64,
        page_size: i64,
    ) -> RepositoryResult<PaginatedResult<Employee>> {
        *self.last_page.lock().unwrap() = Some((page_number, page_size));
        let page = PageRequest::new(page_number, page_size);
        let mut rows = self.snapshot();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.page_size() as usize)
            .collect();
        Ok(PaginatedResult::new(items, total, page))
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<Employee>> {
        Ok(self.snapshot().into_iter().find(|e| e.id == id))
    }

    async fn create(&self, employee: NewEmployee) -> RepositoryResult<Employee> {
        let created = Employee {
            id: Uuid::new_v4(),
            name: employee.name,
            email: employee.email,
            address: employee.address,
        };
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, employee: Employee) -> RepositoryResult<Option<Employee>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|e| e.id == employee.id).map(|row| {
            *row = employee.clone();
            employee
        }))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| e.id != id);
        Ok(rows.len() != before)
    }
}

/// Every call fails as if the database were unreachable.
pub struct FailingEmployees;

fn unreachable_db(operation: &'static str) -> RepositoryError {
    RepositoryError::new(operation, DbErr::Custom("connection refused".into()))
}

#[async_trait]
impl EmployeeRepository for FailingEmployees {
    async fn list_all(&self) -> RepositoryResult<Vec<Employee>> {
        Err(unreachable_db("fetch all employees"))
    }

    async fn list_paginated(&self, _: i64, _: i64) -> RepositoryResult<PaginatedResult<Employee>> {
        Err(unreachable_db("fetch paginated employees"))
    }

    async fn get_by_id(&self, _: Uuid) -> RepositoryResult<Option<Employee>> {
        Err(unreachable_db("fetch employee by id"))
    }

    async fn create(&self, _: NewEmployee) -> RepositoryResult<Employee> {
        Err(unreachable_db("create employee"))
    }

    async fn update(&self, _: Employee) -> RepositoryResult<Option<Employee>> {
        Err(unreachable_db("update employee"))
    }

    async fn delete(&self, _: Uuid) -> RepositoryResult<bool> {
        Err(unreachable_db("delete employee"))
    }
}

/// Panics on listing; used to exercise the panic boundary.
pub struct PanickingEmployees;

#[async_trait]
impl EmployeeRepository for PanickingEmployees {
    async fn list_all(&self) -> RepositoryResult<Vec<Employee>> {
        panic!("store invariant broken")
    }

    async fn list_paginated(&self, _: i64, _: i64) -> RepositoryResult<PaginatedResult<Employee>> {
        Ok(PaginatedResult::new(Vec::new(), 0, PageRequest::default()))
    }

    async fn get_by_id(&self, _: Uuid) -> RepositoryResult<Option<Employee>> {
        Ok(None)
    }

    async fn create(&self, _: NewEmployee) -> RepositoryResult<Employee> {
        Err(unreachable_db("create employee"))
    }

    async fn update(&self, _: Employee) -> RepositoryResult<Option<Employee>> {
        Ok(None)
    }

    async fn delete(&self, _: Uuid) -> RepositoryResult<bool> {
        Ok(false)
    }
}
