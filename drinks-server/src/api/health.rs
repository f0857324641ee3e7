use crate::cache::CacheBackend;
use crate::db;
use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use utoipa::ToSchema;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Represents the health status of a component or the overall service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum HealthStatusType {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "error")]
    Error,
}

/// Status of an individual component
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    pub status: HealthStatusType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ComponentStatus {
    fn from_result(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                status: HealthStatusType::Ok,
                error: None,
                details: None,
            },
            Err(error) => Self {
                status: HealthStatusType::Error,
                error: Some(error),
                details: None,
            },
        }
    }
}

/// Health status of individual components
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub database: ComponentStatus,
    pub cache: ComponentStatus,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatusType,
    pub components: ComponentHealth,
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        let status_code = match self.status {
            HealthStatusType::Ok => StatusCode::OK,
            HealthStatusType::Error => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status_code, Json(self)).into_response()
    }
}

async fn run_health_check<F>(checker_name: &'static str, check: F) -> ComponentStatus
where
    F: Future<Output = Result<(), String>>,
{
    let result = match timeout(HEALTH_CHECK_TIMEOUT, check).await {
        Ok(result) => result,
        Err(_) => Err(format!(
            "{} health check timed out after {} seconds",
            checker_name,
            HEALTH_CHECK_TIMEOUT.as_secs()
        )),
    };
    if let Err(e) = &result {
        warn!("{} is unhealthy: {}", checker_name, e);
    }
    ComponentStatus::from_result(result)
}

/// Check the health of the database and the key set cache
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "All components are healthy", body = HealthResponse),
        (status = 503, description = "One or more components are unhealthy", body = HealthResponse)
    )
)]
pub(crate) async fn health_handler(State(state): State<AppState>) -> HealthResponse {
    let (database, mut cache) = tokio::join!(
        run_health_check("Database", async {
            db::ping(&state.db).await.map_err(|e| e.to_string())
        }),
        run_health_check("Cache", state.cache.health_check()),
    );
    cache.details = Some(json!({
        "enabled": state.cache.is_enabled(),
        "ttl": state.config.cache.ttl,
    }));

    let healthy = database.status == HealthStatusType::Ok && cache.status == HealthStatusType::Ok;
    HealthResponse {
        status: if healthy {
            HealthStatusType::Ok
        } else {
            HealthStatusType::Error
        },
        components: ComponentHealth { database, cache },
    }
}
