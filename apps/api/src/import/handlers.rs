use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::import::reader::SpreadsheetReader;
use crate::import::reconciler::ImportResult;
use crate::import::template::{build_template, TEMPLATE_FILE_NAME};
use crate::import::ImportService;
use crate::state::AppState;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const UPLOAD_FIELD: &str = "file";

/// One uploaded file pulled out of a multipart body.
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl Upload {
    fn is_xlsx(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".xlsx")
    }
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if bytes.is_empty() {
            break;
        }
        return Ok(Upload { file_name, bytes });
    }
    Err(AppError::Validation("No se proporcionó archivo".to_string()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub is_valid: bool,
    pub message: &'static str,
}

/// POST /api/excel/validate
pub async fn handle_validate(mut multipart: Multipart) -> Result<Json<ValidateResponse>, AppError> {
    let upload = read_upload(&mut multipart).await?;
    if !upload.is_xlsx() {
        return Err(AppError::Validation("Solo se permiten archivos .xlsx".to_string()));
    }

    let is_valid = SpreadsheetReader::validate_structure(&upload.bytes);
    Ok(Json(ValidateResponse {
        is_valid,
        message: if is_valid {
            "Estructura del Excel válida"
        } else {
            "Estructura del Excel inválida"
        },
    }))
}

#[derive(Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: ImportResult,
}

/// POST /api/excel/import
pub async fn handle_import(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    let upload = read_upload(&mut multipart).await?;
    info!("Importing employees from '{}' ({} bytes)", upload.file_name, upload.bytes.len());

    let service = ImportService::new(
        state.config.import_policy,
        state.employees.as_ref(),
        state.references.as_ref(),
    );
    let result = service.import(&upload.bytes).await;

    Ok(Json(ImportResponse {
        success: result.success,
        message: if result.success {
            "Importación completada exitosamente"
        } else {
            "Importación completada con errores"
        },
        data: result,
    }))
}

/// GET /api/excel/template
pub async fn handle_template() -> Result<Response, AppError> {
    let bytes = build_template().map_err(|e| anyhow::anyhow!("template generation failed: {e}"))?;
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{TEMPLATE_FILE_NAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
