use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::access::{destination, dispatch::LOGIN_PATH, Role};
use crate::auth::{clear_session_cookie, decode_session_token, session_cookie};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, RequestContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub user_id: uuid::Uuid,
    pub role: Option<Role>,
    pub destination: String,
}

/// POST /auth/session - exchange a provider access token for the session cookie
///
/// The client signs in with the auth provider, then posts the access token here.
/// The response sets the HttpOnly cookie and names the landing page.
///
/// Expected Input:
/// ```json
/// { "access_token": "eyJhbGciOiJIUzI1NiI..." }
/// ```
pub async fn session_create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<SessionRequest>,
) -> Result<Response, ApiError> {
    let token = payload.access_token.trim();
    if token.is_empty() {
        return Err(ApiError::bad_request("access_token is required"));
    }

    let identity = decode_session_token(token, &state.session)?;
    let selection = state.roles.select(&identity, ctx.tenant.as_ref()).await?;

    let cookie = session_cookie(token, &state.session).map_err(|e| {
        tracing::error!("Cannot build session cookie: {}", e);
        ApiError::internal_server_error("Cannot start session")
    })?;

    tracing::info!("Session started for user {} as {:?}", identity.user_id, selection.role);

    let body = SessionCreated {
        user_id: identity.user_id,
        role: selection.role,
        destination: destination(selection.role, selection.slug()),
    };
    Ok(([(SET_COOKIE, cookie)], ApiResponse::success(body)).into_response())
}

/// POST /auth/logout - drop the session cookie and go back to the login page
pub async fn logout(State(state): State<AppState>) -> Result<Response, ApiError> {
    let cookie = clear_session_cookie(&state.session).map_err(|e| {
        tracing::error!("Cannot build session cookie: {}", e);
        ApiError::internal_server_error("Cannot end session")
    })?;
    Ok(([(SET_COOKIE, cookie)], Redirect::to(LOGIN_PATH)).into_response())
}
