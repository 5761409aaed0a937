use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::PublicRoot;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    public_root: PublicRootHealth,
}

#[derive(Serialize)]
pub struct PublicRootHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Returns 200 OK when the public asset root is a readable directory,
/// 503 Service Unavailable otherwise.
pub async fn health_handler(
    Extension(public_root): Extension<PublicRoot>,
) -> (StatusCode, Json<HealthResponse>) {
    let root_health = match tokio::fs::metadata(&public_root.0).await {
        Ok(meta) if meta.is_dir() => PublicRootHealth {
            status: "ok".to_string(),
            error: None,
        },
        Ok(_) => PublicRootHealth {
            status: "error".to_string(),
            error: Some("Not a directory".to_string()),
        },
        Err(e) => PublicRootHealth {
            status: "error".to_string(),
            error: Some(format!("Cannot read: {}", e)),
        },
    };

    let is_healthy = root_health.status == "ok";

    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            public_root: root_health,
        }),
    )
}
