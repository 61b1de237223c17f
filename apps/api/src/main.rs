mod auth;
mod config;
mod dashboard;
mod db;
mod employees;
mod errors;
mod import;
mod models;
mod notify;
mod pdf;
mod references;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::db::create_pool;
use crate::notify::SmtpTransport;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{PgEmailStore, PgEmployeeStore, PgReferenceStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first; startup fails on missing required env vars
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentoPlus API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let mailer = SmtpTransport::new(&config.smtp)?;
    info!(
        "SMTP transport ready ({}:{}, sender {})",
        config.smtp.host, config.smtp.port, config.smtp.from_address
    );

    info!("Spreadsheet import policy: {:?}", config.import_policy);

    let state = AppState {
        tokens: TokenIssuer::new(&config.jwt_key),
        employees: Arc::new(PgEmployeeStore::new(db.clone())),
        references: Arc::new(PgReferenceStore::new(db.clone())),
        emails: Arc::new(PgEmailStore::new(db)),
        mailer: Arc::new(mailer),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
