use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::search::{search, SearchPage, SearchParams};
use super::view::{EmployeeView, ReferenceNames};
use crate::auth::AuthEmployee;
use crate::errors::AppError;
use crate::models::{Employee, EmployeeStatus, JobInfo, NewEmployee, PersonalInfo};
use crate::references::ensure_references_exist;
use crate::state::AppState;

const DUPLICATE_DOCUMENT: &str = "Ya existe un empleado con ese documento.";

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Empleado con ID {id} no encontrado"))
}

/// Body of create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    pub document: String,
    pub name: String,
    pub surname: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub salary: Decimal,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
    pub department_id: i32,
    pub job_title_id: i32,
    pub education_level_id: i32,
    #[serde(default)]
    pub professional_profile: String,
}

impl EmployeeRequest {
    fn split(self) -> (String, PersonalInfo, JobInfo, NaiveDate, Option<EmployeeStatus>) {
        let personal = PersonalInfo {
            name: self.name,
            surname: self.surname,
            birth_date: self.birth_date,
            address: self.address,
            phone: self.phone,
            email: self.email,
        };
        let job = JobInfo {
            salary: self.salary,
            department_id: self.department_id,
            job_title_id: self.job_title_id,
            education_level_id: self.education_level_id,
            professional_profile: self.professional_profile,
        };
        (self.document, personal, job, self.hire_date, self.status)
    }
}

#[derive(Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<EmployeeView>,
}

impl ListResponse {
    fn new(data: Vec<EmployeeView>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Serialize)]
pub struct ItemResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: EmployeeView,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

async fn to_view(state: &AppState, employee: Employee) -> Result<EmployeeView, AppError> {
    let names = ReferenceNames::load(state.references.as_ref()).await?;
    Ok(names.view(employee))
}

async fn to_views(state: &AppState, employees: Vec<Employee>) -> Result<Vec<EmployeeView>, AppError> {
    let names = ReferenceNames::load(state.references.as_ref()).await?;
    Ok(names.views(employees))
}

/// GET /api/employees
pub async fn handle_list(
    _auth: AuthEmployee,
    State(state): State<AppState>,
) -> Result<Json<ListResponse>, AppError> {
    let employees = state.employees.list().await?;
    Ok(Json(ListResponse::new(to_views(&state, employees).await?)))
}

/// GET /api/employees/:id
pub async fn handle_get(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ItemResponse>, AppError> {
    let employee = state.employees.get(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(ItemResponse {
        success: true,
        message: None,
        data: to_view(&state, employee).await?,
    }))
}

/// POST /api/employees
pub async fn handle_create(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Json(req): Json<EmployeeRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), AppError> {
    let (document, personal, job, hire_date, status) = req.split();
    if state.employees.find_by_document(document.trim()).await?.is_some() {
        return Err(AppError::Validation(DUPLICATE_DOCUMENT.to_string()));
    }
    ensure_references_exist(state.references.as_ref(), &job).await?;

    let draft = NewEmployee::new(&document, personal, job, hire_date)?
        .with_status(status.unwrap_or(EmployeeStatus::Active));
    let employee = state.employees.insert(&draft).await?;
    info!("Employee {} created (document {})", employee.id, employee.document);

    Ok((
        StatusCode::CREATED,
        Json(ItemResponse {
            success: true,
            message: Some("Empleado creado exitosamente."),
            data: to_view(&state, employee).await?,
        }),
    ))
}

/// PUT /api/employees/:id
///
/// Every change is applied to a copy first, so a rejected field leaves the
/// stored employee untouched.
pub async fn handle_update(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<EmployeeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut employee = state.employees.get(id).await?.ok_or_else(|| not_found(id))?;
    let (document, personal, job, hire_date, status) = req.split();

    if document.trim() != employee.document {
        if let Some(other) = state.employees.find_by_document(document.trim()).await? {
            if other.id != id {
                return Err(AppError::Validation(DUPLICATE_DOCUMENT.to_string()));
            }
        }
        employee.change_document(&document)?;
    }
    ensure_references_exist(state.references.as_ref(), &job).await?;
    employee.update_personal_info(personal)?;
    employee.update_job_info(job)?;
    if hire_date != employee.hire_date {
        employee.change_hire_date(hire_date)?;
    }
    if let Some(status) = status {
        employee.change_status(status);
    }

    state.employees.update(&employee).await?;
    info!("Employee {id} updated");

    Ok(Json(MessageResponse {
        success: true,
        message: "Empleado actualizado exitosamente.",
    }))
}

/// DELETE /api/employees/:id
pub async fn handle_delete(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.employees.delete(id).await? {
        return Err(not_found(id));
    }
    info!("Employee {id} deleted");
    Ok(Json(MessageResponse {
        success: true,
        message: "Empleado eliminado exitosamente.",
    }))
}

/// GET /api/employees/search?query=&department=&status=&page=&pageSize=
pub async fn handle_search(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchPage>, AppError> {
    let employees = state.employees.list().await?;
    let views = to_views(&state, employees).await?;
    Ok(Json(search(views, &params)))
}

/// GET /api/employees/department/:id
pub async fn handle_by_department(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Path(department_id): Path<i32>,
) -> Result<Json<ListResponse>, AppError> {
    let employees = state.employees.list_by_department(department_id).await?;
    Ok(Json(ListResponse::new(to_views(&state, employees).await?)))
}
