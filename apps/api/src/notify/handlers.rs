use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::AuthEmployee;
use crate::errors::AppError;
use crate::models::EmailMessage;
use crate::notify::dispatcher::{SendEmailRequest, SendEmailResponse};
use crate::state::AppState;

const DEFAULT_MAX_RETRIES: i32 = 3;

/// POST /api/email/send
pub async fn handle_send(
    State(state): State<AppState>,
    Json(req): Json<SendEmailRequest>,
) -> (StatusCode, Json<SendEmailResponse>) {
    let response = state.dispatcher().send_request(req).await;
    let status = if response.status == SendEmailResponse::ERROR_STATUS {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    (status, Json(response))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeRequest {
    pub email: String,
    pub full_name: String,
    pub hire_date: NaiveDate,
}

/// POST /api/email/welcome
pub async fn handle_welcome(
    State(state): State<AppState>,
    Json(req): Json<WelcomeRequest>,
) -> Response {
    let sent = state
        .dispatcher()
        .send_welcome(&req.email, &req.full_name, req.hire_date)
        .await;
    if sent {
        (StatusCode::OK, Json(json!({ "message": "Email enviado" }))).into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Error al enviar" })),
        )
            .into_response()
    }
}

/// GET /api/email/pending
pub async fn handle_pending(
    _auth: AuthEmployee,
    State(state): State<AppState>,
) -> Result<Json<Vec<EmailMessage>>, AppError> {
    Ok(Json(state.emails.pending().await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryQuery {
    pub max_retries: Option<i32>,
}

/// GET /api/email/failed?maxRetries=
pub async fn handle_failed_for_retry(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Query(params): Query<RetryQuery>,
) -> Result<Json<Vec<EmailMessage>>, AppError> {
    let max_retries = params.max_retries.unwrap_or(DEFAULT_MAX_RETRIES);
    Ok(Json(state.emails.failed_for_retry(max_retries).await?))
}

/// GET /api/email/:id
pub async fn handle_get_email(
    _auth: AuthEmployee,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmailMessage>, AppError> {
    let email = state
        .emails
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Email con ID {id} no encontrado")))?;
    Ok(Json(email))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::models::EmailStatus;
    use crate::routes::test_support::TestApp;

    #[tokio::test]
    async fn test_send_records_and_delivers() {
        let app = TestApp::new().await;
        let (status, body) = app
            .call(
                Method::POST,
                "/api/email/send",
                Some(json!({
                    "from": "rh@talento.com",
                    "to": ["a@b.com"],
                    "subject": "Hola",
                    "body": "<p>hola</p>",
                    "cc": ["c@d.com"]
                })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Email enviado exitosamente");
        assert_eq!(app.mailer.sent.load(Ordering::SeqCst), 1);

        let stored = app.emails.snapshot();
        assert_eq!(stored[0].status, EmailStatus::Sent);
        assert_eq!(body["emailId"], stored[0].id.to_string());
    }

    #[tokio::test]
    async fn test_send_without_recipients_is_400() {
        let app = TestApp::new().await;
        let (status, body) = app
            .call(
                Method::POST,
                "/api/email/send",
                Some(json!({ "from": "rh@talento.com", "to": [], "subject": "Hola", "body": "x" })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "Error");
        assert!(app.emails.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_welcome_transport_failure_is_recorded_not_raised() {
        let app = TestApp::new().await;
        app.mailer.fail.store(true, Ordering::SeqCst);
        let (status, body) = app
            .call(
                Method::POST,
                "/api/email/welcome",
                Some(json!({ "email": "a@b.com", "fullName": "Ana Gómez", "hireDate": "2024-02-01" })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Email enviado");
        assert_eq!(app.emails.snapshot()[0].status, EmailStatus::Failed);
    }

    #[tokio::test]
    async fn test_welcome_unstorable_is_500() {
        let app = TestApp::new().await;
        app.emails.fail_add.store(true, Ordering::SeqCst);
        let (status, body) = app
            .call(
                Method::POST,
                "/api/email/welcome",
                Some(json!({ "email": "a@b.com", "fullName": "Ana Gómez", "hireDate": "2024-02-01" })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Error al enviar");
    }

    #[tokio::test]
    async fn test_failed_listing_and_lookup() {
        let app = TestApp::new().await;
        let token = app.login_token().await;
        app.mailer.fail.store(true, Ordering::SeqCst);
        app.call(
            Method::POST,
            "/api/email/welcome",
            Some(json!({ "email": "a@b.com", "fullName": "Ana", "hireDate": "2024-02-01" })),
            None,
        )
        .await;

        let (status, body) = app.call(Method::GET, "/api/email/failed", None, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = app
            .call(Method::GET, "/api/email/failed?maxRetries=1", None, Some(&token))
            .await;
        assert!(body.as_array().unwrap().is_empty());

        let id = app.emails.snapshot()[0].id;
        let (status, _) = app.call(Method::GET, &format!("/api/email/{id}"), None, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);

        let missing = uuid::Uuid::new_v4();
        let (status, body) = app
            .call(Method::GET, &format!("/api/email/{missing}"), None, Some(&token))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], format!("Email con ID {missing} no encontrado"));
    }
}
