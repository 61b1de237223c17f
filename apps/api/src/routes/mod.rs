pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{auth, dashboard, employees, import, notify, pdf, references};

/// Spreadsheet uploads are the largest request bodies the API accepts.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Public
        .route("/api/public/health", get(dashboard::handlers::handle_public_health))
        .route(
            "/api/public/departments",
            get(references::handlers::handle_public_departments),
        )
        .route(
            "/api/public/job-titles",
            get(references::handlers::handle_public_job_titles),
        )
        .route(
            "/api/public/education-levels",
            get(references::handlers::handle_public_education_levels),
        )
        .route(
            "/api/public/company-info",
            get(dashboard::handlers::handle_company_info),
        )
        .route(
            "/api/public/statistics",
            get(dashboard::handlers::handle_statistics),
        )
        // Auth
        .route("/api/auth/login", post(auth::handlers::handle_login))
        .route("/api/auth/register", post(auth::handlers::handle_register))
        // Spreadsheet import
        .route("/api/excel/validate", post(import::handlers::handle_validate))
        .route("/api/excel/import", post(import::handlers::handle_import))
        .route("/api/excel/template", get(import::handlers::handle_template))
        // Notifications
        .route("/api/email/send", post(notify::handlers::handle_send))
        .route("/api/email/welcome", post(notify::handlers::handle_welcome))
        .route("/api/email/pending", get(notify::handlers::handle_pending))
        .route(
            "/api/email/failed",
            get(notify::handlers::handle_failed_for_retry),
        )
        .route("/api/email/:id", get(notify::handlers::handle_get_email))
        // Reference data
        .route(
            "/api/departments",
            get(references::handlers::handle_list_departments)
                .post(references::handlers::handle_create_department),
        )
        .route(
            "/api/departments/:id",
            get(references::handlers::handle_get_department)
                .put(references::handlers::handle_update_department)
                .delete(references::handlers::handle_delete_department),
        )
        .route(
            "/api/jobtitles",
            get(references::handlers::handle_list_job_titles)
                .post(references::handlers::handle_create_job_title),
        )
        .route(
            "/api/educationlevels",
            get(references::handlers::handle_list_education_levels)
                .post(references::handlers::handle_create_education_level),
        )
        // Employees
        .route(
            "/api/employees",
            get(employees::handlers::handle_list).post(employees::handlers::handle_create),
        )
        .route("/api/employees/search", get(employees::handlers::handle_search))
        .route(
            "/api/employees/department/:id",
            get(employees::handlers::handle_by_department),
        )
        .route(
            "/api/employees/:id",
            get(employees::handlers::handle_get)
                .put(employees::handlers::handle_update)
                .delete(employees::handlers::handle_delete),
        )
        // Dashboard
        .route(
            "/api/dashboard/summary",
            get(dashboard::handlers::handle_summary),
        )
        // Resume PDF
        .route("/api/pdf/employee/:id", get(pdf::handlers::handle_employee_pdf))
        .route("/api/pdf/myprofile", get(pdf::handlers::handle_my_profile_pdf))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use super::test_support::TestApp;

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new().await;
        let (status, body) = app.call(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "talento-api");
    }

    #[tokio::test]
    async fn test_protected_routes_reject_missing_token() {
        let app = TestApp::new().await;
        for uri in [
            "/api/employees",
            "/api/employees/1",
            "/api/employees/search",
            "/api/employees/department/1",
            "/api/dashboard/summary",
            "/api/pdf/employee/1",
            "/api/pdf/myprofile",
            "/api/email/pending",
        ] {
            let (status, body) = app.call(Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["success"], false);
        }
    }

    #[tokio::test]
    async fn test_tampered_token_is_rejected() {
        let app = TestApp::new().await;
        let mut token = app.login_token().await;
        token.push('x');
        let (status, _) = app.call(Method::GET, "/api/employees", None, Some(&token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = TestApp::new().await;
        let (status, _) = app.call(Method::GET, "/api/nothing-here", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
