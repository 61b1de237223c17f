use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use super::{statistics, summarize, DashboardSummary, PublicStatistics};
use crate::auth::AuthEmployee;
use crate::employees::ReferenceNames;
use crate::errors::AppError;
use crate::models::ReferenceKind;
use crate::state::AppState;

#[derive(Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

/// GET /api/dashboard/summary
pub async fn handle_summary(
    _auth: AuthEmployee,
    State(state): State<AppState>,
) -> Result<Json<DataResponse<DashboardSummary>>, AppError> {
    let employees = state.employees.list().await?;
    let names = ReferenceNames::load(state.references.as_ref()).await?;
    Ok(Json(DataResponse {
        success: true,
        data: summarize(&employees, &names, Utc::now()),
    }))
}

/// GET /api/public/statistics
pub async fn handle_statistics(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<PublicStatistics>>, AppError> {
    let employees = state.employees.list().await?;
    let departments = state.references.list(ReferenceKind::Department).await?;
    Ok(Json(DataResponse {
        success: true,
        data: statistics(&employees, departments.len(), Utc::now().date_naive()),
    }))
}

/// GET /api/public/company-info
pub async fn handle_company_info() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "TalentoPlus S.A.S.",
            "description": "Empresa líder en gestión de talento humano",
            "contact": {
                "email": "contacto@talentoplus.com",
                "phone": "+57 1 1234567",
                "address": "Calle 123 #45-67, Bogotá, Colombia"
            },
            "services": [
                "Gestión de empleados",
                "Desarrollo organizacional",
                "Capacitación y entrenamiento",
                "Consultoría en recursos humanos"
            ]
        }
    }))
}

/// GET /api/public/health
///
/// Always 200; a failed database ping is reported in the body.
pub async fn handle_public_health(State(state): State<AppState>) -> Json<Value> {
    let connected = match state.employees.ping().await {
        Ok(()) => true,
        Err(e) => {
            error!("Database ping failed: {e:#}");
            false
        }
    };
    Json(json!({
        "status": if connected { "healthy" } else { "unhealthy" },
        "timestamp": Utc::now(),
        "services": {
            "database": if connected { "connected" } else { "disconnected" },
            "api": "running"
        },
        "version": env!("CARGO_PKG_VERSION")
    }))
}
