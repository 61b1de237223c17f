use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::EmailStore;
use crate::models::{EmailMessage, EmailStatus};

const EMAIL_COLUMNS: &str = "id, from_address, to_addresses, cc_addresses, bcc_addresses, \
     subject, body, is_html, status, created_at, sent_at, error_message, retry_count";

#[derive(Clone)]
pub struct PgEmailStore {
    pool: PgPool,
}

impl PgEmailStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmailStore for PgEmailStore {
    async fn add(&self, email: &EmailMessage) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO emails
                (id, from_address, to_addresses, cc_addresses, bcc_addresses,
                 subject, body, is_html, status, created_at, sent_at,
                 error_message, retry_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(email.id)
        .bind(&email.from_address)
        .bind(&email.to_addresses)
        .bind(&email.cc_addresses)
        .bind(&email.bcc_addresses)
        .bind(&email.subject)
        .bind(&email.body)
        .bind(email.is_html)
        .bind(email.status)
        .bind(email.created_at)
        .bind(email.sent_at)
        .bind(&email.error_message)
        .bind(email.retry_count)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, email: &EmailMessage) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE emails SET
                cc_addresses = $2, bcc_addresses = $3, status = $4,
                sent_at = $5, error_message = $6, retry_count = $7
            WHERE id = $1
            "#,
        )
        .bind(email.id)
        .bind(&email.cc_addresses)
        .bind(&email.bcc_addresses)
        .bind(email.status)
        .bind(email.sent_at)
        .bind(&email.error_message)
        .bind(email.retry_count)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<EmailMessage>> {
        let sql = format!("SELECT {EMAIL_COLUMNS} FROM emails WHERE id = $1");
        Ok(sqlx::query_as::<_, EmailMessage>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn pending(&self) -> Result<Vec<EmailMessage>> {
        let sql = format!(
            "SELECT {EMAIL_COLUMNS} FROM emails WHERE status = $1 ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, EmailMessage>(&sql)
            .bind(EmailStatus::Pending)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn failed_for_retry(&self, max_retries: i32) -> Result<Vec<EmailMessage>> {
        let sql = format!(
            "SELECT {EMAIL_COLUMNS} FROM emails \
             WHERE status = $1 AND retry_count < $2 ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, EmailMessage>(&sql)
            .bind(EmailStatus::Failed)
            .bind(max_retries)
            .fetch_all(&self.pool)
            .await?)
    }
}
