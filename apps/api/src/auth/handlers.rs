use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{EmployeeStatus, JobInfo, NewEmployee, PersonalInfo};
use crate::references::ensure_references_exist;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Credenciales inválidas";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub documento: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct LoginEmployee {
    pub id: i32,
    pub document: String,
    pub name: String,
    pub surname: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub employee: LoginEmployee,
}

/// POST /api/auth/login
///
/// `documento` is tried as a document number first and as an email second.
/// Unknown employee and email mismatch both answer 401 with the same message.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let found = match state.employees.find_by_document(&req.documento).await? {
        Some(employee) => Some(employee),
        None => state.employees.find_by_email(&req.documento).await?,
    };

    let Some(employee) = found.filter(|e| e.email == req.email) else {
        warn!("Login denied for identifier {}", req.documento);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let token = state
        .tokens
        .issue(&employee)
        .map_err(|e| anyhow::anyhow!(e))?;
    info!("Employee {} logged in", employee.id);

    Ok(Json(LoginResponse {
        token,
        employee: LoginEmployee {
            id: employee.id,
            document: employee.document,
            name: employee.name,
            surname: employee.surname,
            email: employee.email,
        },
    }))
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn default_estado() -> String {
    "Activo".to_string()
}

fn default_reference_id() -> i32 {
    1
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub documento: String,
    pub nombres: String,
    pub apellidos: String,
    pub fecha_nacimiento: NaiveDate,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub telefono: String,
    pub email: String,
    #[serde(default)]
    pub salario: Decimal,
    #[serde(default = "today")]
    pub fecha_ingreso: NaiveDate,
    #[serde(default = "default_estado")]
    pub estado: String,
    #[serde(default = "default_reference_id")]
    pub departamento_id: i32,
    #[serde(default = "default_reference_id")]
    pub cargo_id: i32,
    #[serde(default = "default_reference_id")]
    pub nivel_educativo_id: i32,
    #[serde(default)]
    pub perfil_profesional: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: &'static str,
    pub employee_id: i32,
}

/// POST /api/auth/register
///
/// The welcome email is best effort: its failure is logged and the
/// registration still succeeds.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    if state.employees.find_by_document(req.documento.trim()).await?.is_some() {
        return Err(AppError::Validation(
            "Ya existe un empleado con ese documento".to_string(),
        ));
    }
    if state.employees.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Validation(
            "Ya existe un empleado con ese email".to_string(),
        ));
    }

    let job = JobInfo {
        salary: req.salario,
        department_id: req.departamento_id,
        job_title_id: req.cargo_id,
        education_level_id: req.nivel_educativo_id,
        professional_profile: req.perfil_profesional,
    };
    ensure_references_exist(state.references.as_ref(), &job).await?;

    let personal = PersonalInfo {
        name: req.nombres,
        surname: req.apellidos,
        birth_date: req.fecha_nacimiento,
        address: req.direccion,
        phone: req.telefono,
        email: req.email,
    };
    let draft = NewEmployee::new(&req.documento, personal, job, req.fecha_ingreso)?
        .with_status(EmployeeStatus::from_import_text(&req.estado));
    let employee = state.employees.insert(&draft).await?;
    info!("Registered employee {} (document {})", employee.id, employee.document);

    let welcomed = state
        .dispatcher()
        .send_welcome(&employee.email, &employee.full_name(), employee.hire_date)
        .await;
    if !welcomed {
        warn!("Welcome email for employee {} was not recorded", employee.id);
    }

    Ok(Json(RegisterResponse {
        message: "Registro exitoso.",
        employee_id: employee.id,
    }))
}
