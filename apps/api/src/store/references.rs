use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::ReferenceStore;
use crate::models::{ReferenceEntity, ReferenceKind};

#[derive(Clone)]
pub struct PgReferenceStore {
    pool: PgPool,
}

impl PgReferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn columns(kind: ReferenceKind) -> &'static str {
    match kind {
        ReferenceKind::EducationLevel => "id, name, sort_order, created_at, modified_at",
        ReferenceKind::Department | ReferenceKind::JobTitle => {
            "id, name, 0 AS sort_order, created_at, modified_at"
        }
    }
}

fn order_by(kind: ReferenceKind) -> &'static str {
    match kind {
        ReferenceKind::EducationLevel => "sort_order, name",
        ReferenceKind::Department | ReferenceKind::JobTitle => "name",
    }
}

#[async_trait]
impl ReferenceStore for PgReferenceStore {
    async fn list(&self, kind: ReferenceKind) -> Result<Vec<ReferenceEntity>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            columns(kind),
            kind.table(),
            order_by(kind)
        );
        Ok(sqlx::query_as::<_, ReferenceEntity>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get(&self, kind: ReferenceKind, id: i32) -> Result<Option<ReferenceEntity>> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", columns(kind), kind.table());
        Ok(sqlx::query_as::<_, ReferenceEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert(&self, kind: ReferenceKind, name: &str) -> Result<ReferenceEntity> {
        // The lower(name) unique index turns a concurrent duplicate into a read of the winner.
        let table = kind.table();
        let sql = format!(
            r#"
            INSERT INTO {table} (name) VALUES ($1)
            ON CONFLICT ((lower(name))) DO UPDATE SET name = {table}.name
            RETURNING {}
            "#,
            columns(kind)
        );
        let entity = sqlx::query_as::<_, ReferenceEntity>(&sql)
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        info!("Stored {} '{}' with id {}", table, entity.name, entity.id);
        Ok(entity)
    }

    async fn rename(&self, kind: ReferenceKind, id: i32, name: &str) -> Result<bool> {
        let sql = format!(
            "UPDATE {} SET name = $2, modified_at = now() WHERE id = $1",
            kind.table()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, kind: ReferenceKind, id: i32) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
