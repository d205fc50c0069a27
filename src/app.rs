use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{elevated, protected, public};
use crate::middleware::{resolve_tenant_middleware, session_middleware};
use crate::state::AppState;

/// Full application router. Every route sees the tenant and session context.
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(page_routes())
        .merge(api_routes())
        .merge(root_routes())
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), resolve_tenant_middleware))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api", get(public::api_info))
        .route("/health", get(public::health))
        .route("/auth/session", post(public::session_create))
        .route("/auth/logout", post(public::logout))
}

fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(protected::landing))
        .route("/org/:slug", get(protected::org_entry))
        .route("/admin/:slug/dashboard", get(protected::admin_dashboard))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/whoami", get(protected::whoami))
        .route("/api/orgs", get(protected::org_list))
        .route("/api/orgs/:slug", get(protected::org_access))
}

fn root_routes() -> Router<AppState> {
    Router::new().route("/api/root/tenants", get(elevated::tenant_list))
}

/// Credentialed CORS for the configured origins; unparsable entries are skipped.
/// An empty list allows any origin without credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods([Method::GET, Method::POST, Method::OPTIONS]);
    if parsed.is_empty() {
        layer.allow_origin(Any).allow_headers(Any)
    } else {
        layer
            .allow_origin(parsed)
            .allow_credentials(true)
            .allow_headers([axum::http::header::AUTHORIZATION, axum::http::header::CONTENT_TYPE])
    }
}
