use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{decode_session_token, extract_session_token, Identity};
use crate::state::AppState;

/// Identity decoded from the session token, or `None` for anonymous requests
#[derive(Clone, Debug, Default)]
pub struct SessionContext(pub Option<Identity>);

/// Middleware that reads the session token (bearer header or cookie) and
/// attaches the caller's identity. It never rejects: routes decide whether
/// an anonymous caller is acceptable.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match extract_session_token(request.headers(), &state.session.cookie_name) {
        Some(token) => match decode_session_token(&token, &state.session) {
            Ok(identity) => {
                tracing::debug!("Session for user {} ({})", identity.user_id, identity.email);
                Some(identity)
            }
            Err(e) => {
                tracing::debug!("Ignoring session token: {}", e);
                None
            }
        },
        None => None,
    };

    request.extensions_mut().insert(SessionContext(identity));
    next.run(request).await
}
