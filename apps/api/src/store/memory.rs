//! In-memory stores backing the unit and router tests.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{EmailStore, EmployeeBatch, EmployeeStore, ReferenceStore};
use crate::models::{EmailMessage, EmailStatus, Employee, NewEmployee, ReferenceEntity, ReferenceKind};

#[derive(Default)]
pub struct MemoryEmployeeStore {
    rows: Mutex<Vec<Employee>>,
    next_id: AtomicI32,
    pub fail_commit: AtomicBool,
    pub commits: AtomicI32,
}

impl MemoryEmployeeStore {
    pub fn snapshot(&self) -> Vec<Employee> {
        self.rows.lock().unwrap().clone()
    }

    fn store_new(rows: &mut Vec<Employee>, id: i32, employee: &NewEmployee) -> Result<Employee> {
        if rows.iter().any(|e| e.document == employee.document) {
            bail!("duplicate key value violates unique constraint \"employees_document_key\"");
        }
        let created = Employee::from_new(id, employee.clone(), Utc::now());
        rows.push(created.clone());
        Ok(created)
    }

    fn allocate_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Employee>> {
        Ok(self.snapshot())
    }

    async fn get(&self, id: i32) -> Result<Option<Employee>> {
        Ok(self.snapshot().into_iter().find(|e| e.id == id))
    }

    async fn find_by_document(&self, document: &str) -> Result<Option<Employee>> {
        Ok(self.snapshot().into_iter().find(|e| e.document == document))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>> {
        Ok(self.snapshot().into_iter().find(|e| e.email == email))
    }

    async fn list_by_department(&self, department_id: i32) -> Result<Vec<Employee>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|e| e.department_id == department_id)
            .collect())
    }

    async fn insert(&self, employee: &NewEmployee) -> Result<Employee> {
        let id = self.allocate_id();
        let mut rows = self.rows.lock().unwrap();
        Self::store_new(&mut rows, id, employee)
    }

    async fn update(&self, employee: &Employee) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|e| e.id == employee.id)
            .ok_or_else(|| anyhow!("employee {} does not exist", employee.id))?;
        *slot = employee.clone();
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| e.id != id);
        Ok(rows.len() < before)
    }

    async fn commit_batch(&self, batch: &EmployeeBatch) -> Result<()> {
        if self.fail_commit.load(Ordering::SeqCst) {
            bail!("connection reset by peer");
        }
        let mut rows = self.rows.lock().unwrap();
        let mut staged = rows.clone();
        for employee in &batch.inserts {
            let id = self.allocate_id();
            Self::store_new(&mut staged, id, employee)?;
        }
        for employee in &batch.updates {
            let slot = staged
                .iter_mut()
                .find(|e| e.id == employee.id)
                .ok_or_else(|| anyhow!("employee {} does not exist", employee.id))?;
            *slot = employee.clone();
        }
        *rows = staged;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryReferenceStore {
    rows: Mutex<Vec<(ReferenceKind, ReferenceEntity)>>,
}

impl MemoryReferenceStore {
    pub fn count(&self, kind: ReferenceKind) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }
}

#[async_trait]
impl ReferenceStore for MemoryReferenceStore {
    async fn list(&self, kind: ReferenceKind) -> Result<Vec<ReferenceEntity>> {
        let mut entities: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, e)| e.clone())
            .collect();
        entities.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.name.cmp(&b.name)));
        Ok(entities)
    }

    async fn get(&self, kind: ReferenceKind, id: i32) -> Result<Option<ReferenceEntity>> {
        Ok(self.list(kind).await?.into_iter().find(|e| e.id == id))
    }

    async fn insert(&self, kind: ReferenceKind, name: &str) -> Result<ReferenceEntity> {
        // Ids are allocated per table, like one SERIAL per reference kind.
        let mut rows = self.rows.lock().unwrap();
        let id = rows
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, e)| e.id)
            .max()
            .unwrap_or(0)
            + 1;
        let entity = ReferenceEntity {
            id,
            name: name.to_string(),
            sort_order: 0,
            created_at: Utc::now(),
            modified_at: None,
        };
        rows.push((kind, entity.clone()));
        Ok(entity)
    }

    async fn rename(&self, kind: ReferenceKind, id: i32, name: &str) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|(k, e)| *k == kind && e.id == id) {
            Some((_, entity)) => {
                entity.name = name.to_string();
                entity.modified_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, kind: ReferenceKind, id: i32) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(k, e)| !(*k == kind && e.id == id));
        Ok(rows.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryEmailStore {
    rows: Mutex<Vec<EmailMessage>>,
    pub fail_add: AtomicBool,
}

impl MemoryEmailStore {
    pub fn snapshot(&self) -> Vec<EmailMessage> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailStore for MemoryEmailStore {
    async fn add(&self, email: &EmailMessage) -> Result<()> {
        if self.fail_add.load(Ordering::SeqCst) {
            bail!("emails table is unavailable");
        }
        self.rows.lock().unwrap().push(email.clone());
        Ok(())
    }

    async fn update(&self, email: &EmailMessage) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|e| e.id == email.id)
            .ok_or_else(|| anyhow!("email {} does not exist", email.id))?;
        *slot = email.clone();
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<EmailMessage>> {
        Ok(self.snapshot().into_iter().find(|e| e.id == id))
    }

    async fn pending(&self) -> Result<Vec<EmailMessage>> {
        let mut pending: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter(|e| e.status == EmailStatus::Pending)
            .collect();
        pending.sort_by_key(|e| e.created_at);
        Ok(pending)
    }

    async fn failed_for_retry(&self, max_retries: i32) -> Result<Vec<EmailMessage>> {
        let mut failed: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter(|e| e.status == EmailStatus::Failed && e.retry_count < max_retries)
            .collect();
        failed.sort_by_key(|e| e.created_at);
        Ok(failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::fixtures::new_employee;

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let store = MemoryEmployeeStore::default();
        store.insert(&new_employee("1", "a@b.com")).await.unwrap();

        let batch = EmployeeBatch {
            inserts: vec![new_employee("2", "c@d.com"), new_employee("1", "e@f.com")],
            updates: vec![],
        };
        assert!(store.commit_batch(&batch).await.is_err());
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_for_retry_respects_ceiling() {
        let store = MemoryEmailStore::default();
        let mut once = EmailMessage::new("a@b.com", vec!["x@y.com".into()], "s", "b", true).unwrap();
        once.mark_failed("timeout");
        let mut thrice = once.clone();
        thrice.id = Uuid::new_v4();
        thrice.mark_failed("timeout");
        thrice.mark_failed("timeout");
        store.add(&once).await.unwrap();
        store.add(&thrice).await.unwrap();

        let retry = store.failed_for_retry(3).await.unwrap();
        assert_eq!(retry.len(), 1);
        assert_eq!(retry[0].id, once.id);
    }
}
