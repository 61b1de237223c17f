//! Persistence seams. Production state holds the Postgres implementations;
//! tests swap in the in-memory ones.

pub mod emails;
pub mod employees;
#[cfg(test)]
pub mod memory;
pub mod references;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{EmailMessage, Employee, NewEmployee, ReferenceEntity, ReferenceKind};

pub use emails::PgEmailStore;
pub use employees::PgEmployeeStore;
pub use references::PgReferenceStore;

/// Staged writes of one spreadsheet import, committed together.
#[derive(Debug, Default, Clone)]
pub struct EmployeeBatch {
    pub inserts: Vec<NewEmployee>,
    pub updates: Vec<Employee>,
}

impl EmployeeBatch {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty()
    }
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Round-trips to the backing database.
    async fn ping(&self) -> Result<()>;
    async fn list(&self) -> Result<Vec<Employee>>;
    async fn get(&self, id: i32) -> Result<Option<Employee>>;
    async fn find_by_document(&self, document: &str) -> Result<Option<Employee>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>>;
    async fn list_by_department(&self, department_id: i32) -> Result<Vec<Employee>>;
    async fn insert(&self, employee: &NewEmployee) -> Result<Employee>;
    async fn update(&self, employee: &Employee) -> Result<()>;
    async fn delete(&self, id: i32) -> Result<bool>;
    /// Applies every staged insert and update atomically.
    async fn commit_batch(&self, batch: &EmployeeBatch) -> Result<()>;
}

#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn list(&self, kind: ReferenceKind) -> Result<Vec<ReferenceEntity>>;
    async fn get(&self, kind: ReferenceKind, id: i32) -> Result<Option<ReferenceEntity>>;
    /// Inserts and commits immediately.
    async fn insert(&self, kind: ReferenceKind, name: &str) -> Result<ReferenceEntity>;
    async fn rename(&self, kind: ReferenceKind, id: i32, name: &str) -> Result<bool>;
    async fn delete(&self, kind: ReferenceKind, id: i32) -> Result<bool>;
}

#[async_trait]
pub trait EmailStore: Send + Sync {
    async fn add(&self, email: &EmailMessage) -> Result<()>;
    async fn update(&self, email: &EmailMessage) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<EmailMessage>>;
    /// Pending messages, oldest first.
    async fn pending(&self) -> Result<Vec<EmailMessage>>;
    /// Failed messages whose retry count is still below `max_retries`, oldest first.
    async fn failed_for_retry(&self, max_retries: i32) -> Result<Vec<EmailMessage>>;
}
