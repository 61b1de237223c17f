//! Import Reconciler: insert-or-update by document number.
//!
//! Rows are processed in file order. Each row either stages a write or yields
//! an error value that is folded into the `ImportResult`; a failing row never
//! stops the ones after it. Staged writes are committed in one batch at the end.

use anyhow::Result;
use serde::Serialize;
use tracing::{error, info, warn};

use super::reader::ParsedRow;
use super::resolver::ReferenceResolver;
use crate::models::{Employee, EmployeeStatus, JobInfo, NewEmployee, PersonalInfo, ReferenceKind};
use crate::store::{EmployeeBatch, EmployeeStore, ReferenceStore};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    pub imported_count: u32,
    pub updated_count: u32,
    pub error_count: u32,
    pub errors: Vec<String>,
    pub messages: Vec<String>,
}

impl ImportResult {
    /// A result for an import that could not run or could not be saved.
    pub fn general_failure(mut self, err: impl std::fmt::Display) -> Self {
        self.success = false;
        self.errors.push(format!("Error general: {err}"));
        self
    }

    fn record(mut self, row: &ParsedRow, outcome: Result<RowOutcome>) -> Self {
        match outcome {
            Ok(RowOutcome::Created) => {
                self.imported_count += 1;
                self.messages
                    .push(format!("Empleado creado: {} {}", row.first_name, row.last_name));
            }
            Ok(RowOutcome::Updated) => {
                self.updated_count += 1;
                self.messages
                    .push(format!("Empleado actualizado: {} {}", row.first_name, row.last_name));
            }
            Err(e) => {
                warn!("Import row for document {} failed: {e:#}", row.document);
                self.error_count += 1;
                self.errors.push(format!("Error en registro {}: {e}", row.document));
            }
        }
        self
    }

    fn summary(&self) -> String {
        format!(
            "Importación completada: {} nuevos, {} actualizados, {} errores",
            self.imported_count, self.updated_count, self.error_count
        )
    }
}

enum RowOutcome {
    Created,
    Updated,
}

/// A write waiting for the end-of-import commit.
enum Staged {
    New(NewEmployee),
    Existing(Employee),
}

impl Staged {
    fn document(&self) -> &str {
        match self {
            Staged::New(e) => &e.document,
            Staged::Existing(e) => &e.document,
        }
    }
}

fn into_batch(staged: Vec<Staged>) -> EmployeeBatch {
    staged
        .into_iter()
        .fold(EmployeeBatch::default(), |mut batch, write| {
            match write {
                Staged::New(e) => batch.inserts.push(e),
                Staged::Existing(e) => batch.updates.push(e),
            }
            batch
        })
}

pub struct Reconciler<'a> {
    employees: &'a dyn EmployeeStore,
    resolver: ReferenceResolver<'a>,
}

impl<'a> Reconciler<'a> {
    pub fn new(employees: &'a dyn EmployeeStore, references: &'a dyn ReferenceStore) -> Self {
        Self {
            employees,
            resolver: ReferenceResolver::new(references),
        }
    }

    pub async fn import_all(&self, rows: &[ParsedRow], start: ImportResult) -> ImportResult {
        let mut staged = Vec::new();
        let mut result = start;
        for row in rows {
            let outcome = self.process_row(row, &mut staged).await;
            result = result.record(row, outcome);
        }

        let batch = into_batch(staged);
        if !batch.is_empty() {
            if let Err(e) = self.employees.commit_batch(&batch).await {
                error!("Import commit failed: {e:#}");
                return result.general_failure(e);
            }
        }

        result.success = result.error_count == 0;
        result.messages.push(result.summary());
        info!("{}", result.summary());
        result
    }

    async fn process_row(&self, row: &ParsedRow, staged: &mut Vec<Staged>) -> Result<RowOutcome> {
        let department = self.resolver.resolve(ReferenceKind::Department, &row.department).await?;
        let job_title = self.resolver.resolve(ReferenceKind::JobTitle, &row.job_title).await?;
        let education = self
            .resolver
            .resolve(ReferenceKind::EducationLevel, &row.education_level)
            .await?;
        let status = EmployeeStatus::from_import_text(&row.status);

        let personal = PersonalInfo {
            name: row.first_name.clone(),
            surname: row.last_name.clone(),
            birth_date: row.birth_date,
            address: row.address.clone(),
            phone: row.phone.clone(),
            email: row.email.clone(),
        };
        let job = JobInfo {
            salary: row.salary,
            department_id: department.id,
            job_title_id: job_title.id,
            education_level_id: education.id,
            professional_profile: row.professional_profile.clone(),
        };

        // Earlier rows of the same file win over the store.
        if let Some(slot) = staged.iter_mut().find(|s| s.document() == row.document) {
            let replacement = match slot {
                Staged::New(draft) => Staged::New(
                    NewEmployee::new(&row.document, personal, job, draft.hire_date)?.with_status(status),
                ),
                Staged::Existing(current) => Staged::Existing(overwrite(current.clone(), personal, job, status)?),
            };
            *slot = replacement;
            return Ok(RowOutcome::Updated);
        }

        match self.employees.find_by_document(&row.document).await? {
            Some(existing) => {
                staged.push(Staged::Existing(overwrite(existing, personal, job, status)?));
                Ok(RowOutcome::Updated)
            }
            None => {
                let draft = NewEmployee::new(&row.document, personal, job, row.hire_date)?.with_status(status);
                staged.push(Staged::New(draft));
                Ok(RowOutcome::Created)
            }
        }
    }
}

fn overwrite(
    mut employee: Employee,
    personal: PersonalInfo,
    job: JobInfo,
    status: EmployeeStatus,
) -> Result<Employee> {
    employee.update_personal_info(personal)?;
    employee.update_job_info(job)?;
    employee.change_status(status);
    Ok(employee)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::employee::fixtures::new_employee;
    use crate::store::memory::{MemoryEmployeeStore, MemoryReferenceStore};

    fn parsed(document: &str, email: &str) -> ParsedRow {
        ParsedRow {
            document: document.to_string(),
            first_name: "Ana".to_string(),
            last_name: "Gómez".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1991, 3, 4).unwrap(),
            address: "Carrera 7".to_string(),
            phone: "3100000000".to_string(),
            email: email.to_string(),
            job_title: "Analista".to_string(),
            salary: Decimal::new(4_500_000, 0),
            hire_date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            status: "Vacaciones".to_string(),
            education_level: "Profesional".to_string(),
            professional_profile: "Datos".to_string(),
            department: "Finanzas".to_string(),
        }
    }

    async fn run(employees: &MemoryEmployeeStore, refs: &MemoryReferenceStore, rows: &[ParsedRow]) -> ImportResult {
        Reconciler::new(employees, refs)
            .import_all(rows, ImportResult::default())
            .await
    }

    #[tokio::test]
    async fn test_novel_document_is_imported() {
        let employees = MemoryEmployeeStore::default();
        let refs = MemoryReferenceStore::default();

        let result = run(&employees, &refs, &[parsed("10", "ana@x.com")]).await;
        assert!(result.success);
        assert_eq!(result.imported_count, 1);
        assert_eq!(result.updated_count, 0);
        assert_eq!(result.messages[0], "Empleado creado: Ana Gómez");
        assert_eq!(
            result.messages.last().unwrap(),
            "Importación completada: 1 nuevos, 0 actualizados, 0 errores"
        );

        let stored = employees.snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, EmployeeStatus::OnVacation);
        assert_eq!(refs.count(ReferenceKind::Department), 1);
    }

    #[tokio::test]
    async fn test_existing_document_is_updated() {
        let employees = MemoryEmployeeStore::default();
        let refs = MemoryReferenceStore::default();
        let original = employees.insert(&new_employee("10", "old@x.com")).await.unwrap();

        let result = run(&employees, &refs, &[parsed("10", "ana@x.com")]).await;
        assert_eq!(result.imported_count, 0);
        assert_eq!(result.updated_count, 1);

        let stored = employees.snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, original.id);
        assert_eq!(stored[0].email, "ana@x.com");
        assert_eq!(stored[0].salary, Decimal::new(4_500_000, 0));
        // Hire date is not part of the overwrite.
        assert_eq!(stored[0].hire_date, original.hire_date);
    }

    #[tokio::test]
    async fn test_failing_rows_are_counted_and_others_committed() {
        let employees = MemoryEmployeeStore::default();
        let refs = MemoryReferenceStore::default();
        let mut underage = parsed("2", "b@x.com");
        underage.birth_date = Utc::now().date_naive();
        let mut bad_email = parsed("3", "nope");
        bad_email.first_name = "Eva".to_string();

        let rows = [parsed("1", "a@x.com"), underage, bad_email, parsed("4", "d@x.com")];
        let result = run(&employees, &refs, &rows).await;

        assert!(!result.success);
        assert_eq!(result.error_count, 2);
        assert_eq!(result.imported_count, 2);
        assert!(result.errors[0].starts_with("Error en registro 2:"));
        assert!(result.errors[1].starts_with("Error en registro 3:"));
        assert_eq!(employees.snapshot().len(), 2);
        assert_eq!(employees.commits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_document_in_one_file_updates_staged_row() {
        let employees = MemoryEmployeeStore::default();
        let refs = MemoryReferenceStore::default();
        let mut second = parsed("7", "second@x.com");
        second.status = "Inactivo".to_string();

        let result = run(&employees, &refs, &[parsed("7", "first@x.com"), second]).await;
        assert!(result.success);
        assert_eq!(result.imported_count, 1);
        assert_eq!(result.updated_count, 1);

        let stored = employees.snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].email, "second@x.com");
        assert_eq!(stored[0].status, EmployeeStatus::Inactive);
    }

    #[tokio::test]
    async fn test_failed_duplicate_keeps_first_staged_version() {
        let employees = MemoryEmployeeStore::default();
        let refs = MemoryReferenceStore::default();

        let result = run(&employees, &refs, &[parsed("7", "first@x.com"), parsed("7", "broken")]).await;
        assert_eq!(result.error_count, 1);
        assert_eq!(employees.snapshot()[0].email, "first@x.com");
    }

    #[tokio::test]
    async fn test_commit_failure_is_general_error() {
        let employees = MemoryEmployeeStore::default();
        employees.fail_commit.store(true, Ordering::SeqCst);
        let refs = MemoryReferenceStore::default();

        let result = run(&employees, &refs, &[parsed("1", "a@x.com")]).await;
        assert!(!result.success);
        assert_eq!(result.error_count, 0);
        assert!(result.errors[0].starts_with("Error general:"));
        assert!(employees.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_empty_input_succeeds_without_commit() {
        let employees = MemoryEmployeeStore::default();
        let refs = MemoryReferenceStore::default();

        let result = run(&employees, &refs, &[]).await;
        assert!(result.success);
        assert_eq!(employees.commits.load(Ordering::SeqCst), 0);
    }
}
