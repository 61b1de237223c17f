pub mod handlers;

use std::collections::HashMap;

use anyhow::Result;

use crate::errors::AppError;
use crate::models::{JobInfo, ReferenceKind};
use crate::store::ReferenceStore;

/// Rejects job info pointing at a department, job title or education level
/// that does not exist.
pub async fn ensure_references_exist(store: &dyn ReferenceStore, job: &JobInfo) -> Result<(), AppError> {
    let wanted = [
        (ReferenceKind::Department, job.department_id),
        (ReferenceKind::JobTitle, job.job_title_id),
        (ReferenceKind::EducationLevel, job.education_level_id),
    ];
    for (kind, id) in wanted {
        if store.get(kind, id).await?.is_none() {
            return Err(AppError::Validation(not_found_message(kind, id)));
        }
    }
    Ok(())
}

pub fn not_found_message(kind: ReferenceKind, id: i32) -> String {
    format!("{} con ID {id} no encontrado", kind.label())
}

/// Id → name lookup for one reference kind.
pub async fn name_index(store: &dyn ReferenceStore, kind: ReferenceKind) -> Result<HashMap<i32, String>> {
    Ok(store
        .list(kind)
        .await?
        .into_iter()
        .map(|entity| (entity.id, entity.name))
        .collect())
}
