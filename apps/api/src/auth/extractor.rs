use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::warn;

use super::token::{Claims, TokenIssuer};
use crate::errors::AppError;

/// The employee behind a verified bearer token. Adding this extractor to a
/// handler makes the route require authentication.
#[derive(Debug, Clone)]
pub struct AuthEmployee {
    pub document: String,
    pub email: String,
    pub employee_id: i32,
}

impl From<Claims> for AuthEmployee {
    fn from(claims: Claims) -> Self {
        Self {
            document: claims.sub,
            email: claims.email,
            employee_id: claims.employee_id,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthEmployee
where
    TokenIssuer: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Token requerido".to_string()))?;

        let token = TokenIssuer::extract_from_header(header)
            .ok_or_else(|| AppError::Unauthorized("Encabezado de autorización inválido".to_string()))?;

        let issuer = TokenIssuer::from_ref(state);
        match issuer.verify(token) {
            Ok(claims) => Ok(claims.into()),
            Err(e) => {
                warn!("Rejected bearer token on {}: {e}", parts.uri);
                Err(AppError::Unauthorized(e.to_string()))
            }
        }
    }
}
