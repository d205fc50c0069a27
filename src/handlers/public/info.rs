use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api - service description
pub async fn api_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "LMS API (Rust)",
            "version": env!("CARGO_PKG_VERSION"),
            "tenants": state.tenants.len(),
            "endpoints": {
                "landing": "/ (redirects by role)",
                "org": "/org/:slug (redirects by role in organization)",
                "admin": "/admin/:slug/dashboard (admin)",
                "session": "/auth/session, /auth/logout (public)",
                "whoami": "/api/auth/whoami (session)",
                "orgs": "/api/orgs[/:slug] (session)",
                "root": "/api/root/tenants (super-admin)",
            }
        }
    }))
}

/// GET /health - liveness plus directory connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.directory.ping().await {
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
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
