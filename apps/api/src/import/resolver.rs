//! Reference-Data Resolver: find-or-create for departments, job titles and
//! education levels by name.
//!
//! The lookup is a read of the whole table followed by a case-insensitive
//! scan. A miss is persisted immediately, outside the import's employee batch.
//! Two imports racing on the same new name both reach `ReferenceStore::insert`;
//! the Postgres store folds the loser onto the winner's row.

use anyhow::Result;
use tracing::info;

use crate::models::{ReferenceEntity, ReferenceKind};
use crate::store::ReferenceStore;

pub struct ReferenceResolver<'a> {
    store: &'a dyn ReferenceStore,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(store: &'a dyn ReferenceStore) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, kind: ReferenceKind, name: &str) -> Result<ReferenceEntity> {
        let existing = self.store.list(kind).await?;
        if let Some(found) = existing.into_iter().find(|entity| entity.matches(name)) {
            return Ok(found);
        }

        let created = self.store.insert(kind, name).await?;
        info!("Created {} '{}' (id {})", kind.label(), created.name, created.id);
        Ok(created)
    }
}
