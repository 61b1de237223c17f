//! Token Issuer: HS256 bearer tokens for authenticated employees.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Employee;

pub const ISSUER: &str = "TalentoPlus";
pub const AUDIENCE: &str = "TalentoPlusClients";
const TOKEN_LIFETIME_HOURS: i64 = 3;

/// Claims carried by every issued token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Employee document number.
    pub sub: String,
    pub email: String,
    #[serde(rename = "employeeId")]
    pub employee_id: i32,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expirado")]
    Expired,

    #[error("Token inválido: {0}")]
    Invalid(String),

    #[error("No se pudo firmar el token: {0}")]
    Signing(String),
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, employee: &Employee) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: employee.document.clone(),
            email: employee.email.clone(),
            employee_id: employee.id,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks signature and expiry. Issuer and audience are carried but not enforced.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }

    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::fixtures::new_employee;

    const SECRET: &str = "an-unguessable-signing-key-of-32+bytes";

    fn employee() -> Employee {
        Employee::from_new(42, new_employee("123", "a@b.com"), Utc::now())
    }

    #[test]
    fn test_issued_token_carries_identity() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.issue(&employee()).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.sub, "123");
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.employee_id, 42);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.aud, AUDIENCE);
        assert_eq!(claims.exp - claims.iat, 3 * 3600);
    }

    #[test]
    fn test_each_token_has_fresh_jti() {
        let issuer = TokenIssuer::new(SECRET);
        let a = issuer.verify(&issuer.issue(&employee()).unwrap()).unwrap();
        let b = issuer.verify(&issuer.issue(&employee()).unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_foreign_key_is_rejected() {
        let token = TokenIssuer::new(SECRET).issue(&employee()).unwrap();
        let other = TokenIssuer::new("a-completely-different-key-of-32-bytes");
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let issuer = TokenIssuer::new(SECRET);
        let past = Utc::now() - Duration::hours(4);
        let claims = Claims {
            sub: "123".into(),
            email: "a@b.com".into(),
            employee_id: 42,
            jti: Uuid::new_v4().to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
            iss: ISSUER.into(),
            aud: AUDIENCE.into(),
        };
        let token = issuer.sign(&claims).unwrap();
        assert!(matches!(issuer.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_bearer_prefix() {
        assert_eq!(TokenIssuer::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(TokenIssuer::extract_from_header("Basic abc"), None);
    }
}
