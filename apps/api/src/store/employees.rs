use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgExecutor, PgPool};
use tracing::info;

use super::{EmployeeBatch, EmployeeStore};
use crate::models::{Employee, NewEmployee};

const EMPLOYEE_COLUMNS: &str = "id, document, name, surname, birth_date, address, phone, email, \
     salary, hire_date, status, department_id, job_title_id, education_level_id, \
     professional_profile, created_at, modified_at";

#[derive(Clone)]
pub struct PgEmployeeStore {
    pool: PgPool,
}

impl PgEmployeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_employee<'e, E: PgExecutor<'e>>(
    executor: E,
    employee: &NewEmployee,
) -> sqlx::Result<Employee> {
    let sql = format!(
        r#"
        INSERT INTO employees
            (document, name, surname, birth_date, address, phone, email,
             salary, hire_date, status, department_id, job_title_id,
             education_level_id, professional_profile)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING {EMPLOYEE_COLUMNS}
        "#
    );
    sqlx::query_as::<_, Employee>(&sql)
        .bind(&employee.document)
        .bind(&employee.personal.name)
        .bind(&employee.personal.surname)
        .bind(employee.personal.birth_date)
        .bind(&employee.personal.address)
        .bind(&employee.personal.phone)
        .bind(&employee.personal.email)
        .bind(employee.job.salary)
        .bind(employee.hire_date)
        .bind(employee.status)
        .bind(employee.job.department_id)
        .bind(employee.job.job_title_id)
        .bind(employee.job.education_level_id)
        .bind(&employee.job.professional_profile)
        .fetch_one(executor)
        .await
}

async fn update_employee<'e, E: PgExecutor<'e>>(
    executor: E,
    employee: &Employee,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        UPDATE employees SET
            document = $2, name = $3, surname = $4, birth_date = $5, address = $6,
            phone = $7, email = $8, salary = $9, hire_date = $10, status = $11,
            department_id = $12, job_title_id = $13, education_level_id = $14,
            professional_profile = $15, modified_at = $16
        WHERE id = $1
        "#,
    )
    .bind(employee.id)
    .bind(&employee.document)
    .bind(&employee.name)
    .bind(&employee.surname)
    .bind(employee.birth_date)
    .bind(&employee.address)
    .bind(&employee.phone)
    .bind(&employee.email)
    .bind(employee.salary)
    .bind(employee.hire_date)
    .bind(employee.status)
    .bind(employee.department_id)
    .bind(employee.job_title_id)
    .bind(employee.education_level_id)
    .bind(&employee.professional_profile)
    .bind(employee.modified_at.unwrap_or_else(Utc::now))
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY id");
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get(&self, id: i32) -> Result<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1");
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_document(&self, document: &str) -> Result<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE document = $1");
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .bind(document)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>> {
        let sql =
            format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE email = $1 ORDER BY id LIMIT 1");
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_by_department(&self, department_id: i32) -> Result<Vec<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE department_id = $1 ORDER BY id"
        );
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .bind(department_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert(&self, employee: &NewEmployee) -> Result<Employee> {
        let created = insert_employee(&self.pool, employee).await?;
        info!("Inserted employee {} (document {})", created.id, created.document);
        Ok(created)
    }

    async fn update(&self, employee: &Employee) -> Result<()> {
        update_employee(&self.pool, employee).await?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn commit_batch(&self, batch: &EmployeeBatch) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for employee in &batch.inserts {
            insert_employee(&mut *tx, employee).await?;
        }
        for employee in &batch.updates {
            update_employee(&mut *tx, employee).await?;
        }
        tx.commit().await?;

        info!(
            "Committed employee batch: {} inserts, {} updates",
            batch.inserts.len(),
            batch.updates.len()
        );
        Ok(())
    }
}
