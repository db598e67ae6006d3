use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::state::AppState;

/// GET / - service description
#[utoipa::path(
    get, path = "/", tag = "System", operation_id = "service_info",
    responses((status = 200, description = "Service description"))
)]
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Stores REST API",
            "version": version,
            "description": "Catalog of stores, items and tags with JWT authentication",
            "endpoints": {
                "auth": "/register, /login, /refresh, /logout (public token acquisition)",
                "users": "/user/:id",
                "stores": "/store[/:id]",
                "items": "/item[/:id]",
                "tags": "/store/:id/tag, /tag/:id, /item/:id/tag/:tag_id",
                "health": "/health",
                "docs": "/swagger-ui, /openapi.json",
            }
        }
    }))
}

/// GET /health - 503 when the database does not answer
#[utoipa::path(
    get, path = "/health", tag = "System", operation_id = "health_check",
    responses((status = 200, description = "Database reachable"),
        (status = 503, description = "Database unavailable"))
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "SERVICE_UNAVAILABLE",
                    "message": "Database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                    }
                })),
            )
        }
    }
}
