use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Local;
use tracing::info;

use super::employee_resume;
use crate::auth::AuthEmployee;
use crate::employees::ReferenceNames;
use crate::errors::AppError;
use crate::models::Employee;
use crate::state::AppState;

const PDF_CONTENT_TYPE: &str = "application/pdf";

async fn load(state: &AppState, id: i32) -> Result<Employee, AppError> {
    state
        .employees
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Empleado con ID {id} no encontrado")))
}

async fn pdf_response(state: &AppState, employee: Employee, file_name: String) -> Result<Response, AppError> {
    let id = employee.id;
    let names = ReferenceNames::load(state.references.as_ref()).await?;
    let bytes = employee_resume(&names.view(employee), Local::now().naive_local())
        .map_err(|e| anyhow::anyhow!(e))?;
    info!("Generated resume PDF for employee {id} ({} bytes)", bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                attachment_disposition(&file_name),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// `attachment` disposition with quotes, backslashes and control characters
/// in the name replaced by `_`.
fn attachment_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

/// GET /api/pdf/employee/:id
pub async fn handle_employee_pdf(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let employee = load(&state, id).await?;
    let file_name = format!(
        "HojaVida_{}_{}_{}.pdf",
        employee.document, employee.name, employee.surname
    );
    pdf_response(&state, employee, file_name).await
}

/// GET /api/pdf/myprofile
pub async fn handle_my_profile_pdf(
    auth: AuthEmployee,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let employee = load(&state, auth.employee_id).await?;
    info!("Own resume requested by {} ({})", auth.document, auth.email);
    let file_name = format!("Mi_HojaVida_{}.pdf", employee.document);
    pdf_response(&state, employee, file_name).await
}

#[cfg(test)]
mod tests {
    use axum::http::{header, Method, StatusCode};
    use lopdf::Document;

    use super::attachment_disposition;
    use crate::routes::test_support::TestApp;
    use crate::store::EmployeeStore;

    #[tokio::test]
    async fn test_employee_pdf_download() {
        let app = TestApp::new().await;
        let token = app.login_token().await;
        let employee = app.seed_employee("123", "a@b.com").await;

        let (status, headers, bytes) = app
            .call_raw(Method::GET, &format!("/api/pdf/employee/{}", employee.id), Some(&token))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"HojaVida_123_Juan_Pérez.pdf\""
        );
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
    }

    #[tokio::test]
    async fn test_my_profile_uses_token_employee() {
        let app = TestApp::new().await;
        let token = app.login_token().await;

        let (status, headers, _) = app.call_raw(Method::GET, "/api/pdf/myprofile", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Mi_HojaVida_900.pdf\""
        );
    }

    #[tokio::test]
    async fn test_unknown_employee_is_404() {
        let app = TestApp::new().await;
        let token = app.login_token().await;
        let (status, _, _) = app.call_raw(Method::GET, "/api/pdf/employee/999", Some(&token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_disposition_replaces_quotes() {
        assert_eq!(
            attachment_disposition("HojaVida_1_Ana \"La Jefa\"_Ruiz\\.pdf"),
            "attachment; filename=\"HojaVida_1_Ana _La Jefa__Ruiz_.pdf\""
        );
        assert_eq!(
            attachment_disposition("Mi_HojaVida_12\r\n.pdf"),
            "attachment; filename=\"Mi_HojaVida_12__.pdf\""
        );
    }

    #[tokio::test]
    async fn test_quoted_name_keeps_header_well_formed() {
        let app = TestApp::new().await;
        let token = app.login_token().await;
        let mut employee = app.seed_employee("123", "a@b.com").await;
        employee.name = "Juan \"JJ\"".to_string();
        app.employees.update(&employee).await.unwrap();

        let (status, headers, _) = app
            .call_raw(Method::GET, &format!("/api/pdf/employee/{}", employee.id), Some(&token))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"HojaVida_123_Juan _JJ__Pérez.pdf\""
        );
    }
}
