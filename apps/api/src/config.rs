use anyhow::{bail, Context, Result};

use crate::import::reader::ParsePolicy;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_key: String,
    pub port: u16,
    pub rust_log: String,
    pub smtp: SmtpConfig,
    pub import_policy: ParsePolicy,
}

/// Outbound mail settings. `from_address` is the envelope sender for every message.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub tls: bool,
    pub from_address: String,
    pub from_name: String,
}

const MIN_JWT_KEY_LEN: usize = 32;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let jwt_key = require_env("JWT_KEY")?;
        if jwt_key.len() < MIN_JWT_KEY_LEN {
            bail!("JWT_KEY must be at least {MIN_JWT_KEY_LEN} bytes long");
        }

        let username = std::env::var("SMTP_USERNAME").unwrap_or_default();
        let smtp = SmtpConfig {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: parse_env("SMTP_PORT", 587)?,
            password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            tls: parse_env("SMTP_TLS", true)?,
            from_address: std::env::var("MAIL_FROM").unwrap_or_else(|_| username.clone()),
            from_name: std::env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "TalentoPlus".to_string()),
            username,
        };

        let import_policy = match std::env::var("IMPORT_PARSE_POLICY") {
            Ok(raw) => raw
                .parse::<ParsePolicy>()
                .with_context(|| format!("IMPORT_PARSE_POLICY has an unknown value '{raw}'"))?,
            Err(_) => ParsePolicy::Lenient,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_key,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            smtp,
            import_policy,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
