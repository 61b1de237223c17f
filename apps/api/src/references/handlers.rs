use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::not_found_message;
use crate::auth::AuthEmployee;
use crate::errors::AppError;
use crate::models::{require_text, ReferenceEntity, ReferenceKind};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NameRequest {
    pub name: String,
}

/// Trimmed `{id, name}` view served on the public endpoints.
#[derive(Serialize)]
pub struct ReferenceSummary {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize)]
pub struct PublicListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<ReferenceSummary>,
}

async fn list(state: &AppState, kind: ReferenceKind) -> Result<Vec<ReferenceEntity>, AppError> {
    Ok(state.references.list(kind).await?)
}

async fn public_list(state: &AppState, kind: ReferenceKind) -> Result<Json<PublicListResponse>, AppError> {
    let data: Vec<ReferenceSummary> = list(state, kind)
        .await?
        .into_iter()
        .map(|e| ReferenceSummary { id: e.id, name: e.name })
        .collect();
    Ok(Json(PublicListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

async fn create(state: &AppState, kind: ReferenceKind, req: NameRequest) -> Result<(StatusCode, Json<ReferenceEntity>), AppError> {
    require_text("nombre", &req.name)?;
    let entity = state.references.insert(kind, req.name.trim()).await?;
    info!("{} {} created", kind.label(), entity.id);
    Ok((StatusCode::CREATED, Json(entity)))
}

// ────────────────────────────────────────────────────────────────────────────
// Departments
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/departments
pub async fn handle_list_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReferenceEntity>>, AppError> {
    Ok(Json(list(&state, ReferenceKind::Department).await?))
}

/// GET /api/departments/:id
pub async fn handle_get_department(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ReferenceEntity>, AppError> {
    let department = state
        .references
        .get(ReferenceKind::Department, id)
        .await?
        .ok_or_else(|| AppError::NotFound(not_found_message(ReferenceKind::Department, id)))?;
    Ok(Json(department))
}

/// POST /api/departments
pub async fn handle_create_department(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<(StatusCode, Json<ReferenceEntity>), AppError> {
    create(&state, ReferenceKind::Department, req).await
}

/// PUT /api/departments/:id
pub async fn handle_update_department(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<NameRequest>,
) -> Result<StatusCode, AppError> {
    require_text("nombre", &req.name)?;
    if !state
        .references
        .rename(ReferenceKind::Department, id, req.name.trim())
        .await?
    {
        return Err(AppError::NotFound(not_found_message(ReferenceKind::Department, id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/departments/:id
pub async fn handle_delete_department(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !state.references.delete(ReferenceKind::Department, id).await? {
        return Err(AppError::NotFound(not_found_message(ReferenceKind::Department, id)));
    }
    info!("Department {id} deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Job titles and education levels
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/jobtitles
pub async fn handle_list_job_titles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReferenceEntity>>, AppError> {
    Ok(Json(list(&state, ReferenceKind::JobTitle).await?))
}

/// POST /api/jobtitles
pub async fn handle_create_job_title(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<(StatusCode, Json<ReferenceEntity>), AppError> {
    create(&state, ReferenceKind::JobTitle, req).await
}

/// GET /api/educationlevels
pub async fn handle_list_education_levels(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReferenceEntity>>, AppError> {
    Ok(Json(list(&state, ReferenceKind::EducationLevel).await?))
}

/// POST /api/educationlevels
pub async fn handle_create_education_level(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<(StatusCode, Json<ReferenceEntity>), AppError> {
    create(&state, ReferenceKind::EducationLevel, req).await
}

// ────────────────────────────────────────────────────────────────────────────
// Public lookups
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/public/departments
pub async fn handle_public_departments(
    State(state): State<AppState>,
) -> Result<Json<PublicListResponse>, AppError> {
    public_list(&state, ReferenceKind::Department).await
}

/// GET /api/public/job-titles
pub async fn handle_public_job_titles(
    State(state): State<AppState>,
) -> Result<Json<PublicListResponse>, AppError> {
    public_list(&state, ReferenceKind::JobTitle).await
}

/// GET /api/public/education-levels
pub async fn handle_public_education_levels(
    State(state): State<AppState>,
) -> Result<Json<PublicListResponse>, AppError> {
    public_list(&state, ReferenceKind::EducationLevel).await
}
