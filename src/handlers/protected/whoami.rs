use axum::extract::State;
use serde::Serialize;

use crate::access::{destination, Role};
use crate::auth::Identity;
use crate::database::Organization;
use crate::middleware::{ApiResponse, ApiResult, RequestContext};
use crate::state::AppState;
use crate::tenant::Tenant;

#[derive(Debug, Serialize)]
pub struct Whoami {
    pub user: Identity,
    pub tenant: Option<Tenant>,
    pub role: Option<Role>,
    pub organization: Option<Organization>,
    pub destination: String,
}

/// GET /api/auth/whoami - current identity plus the role used for redirects
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "data": {
///     "user": { "user_id": "...", "email": "a@acme.test", "profile_role": null },
///     "tenant": null,
///     "role": "admin",
///     "organization": { "id": "...", "slug": "acme", "name": "Acme" },
///     "destination": "/admin/acme/dashboard"
///   }
/// }
/// ```
pub async fn whoami(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<Whoami> {
    let identity = ctx.require_identity()?;
    let selection = state.roles.select(identity, ctx.tenant.as_ref()).await?;

    Ok(ApiResponse::success(Whoami {
        destination: destination(selection.role, selection.slug()),
        user: identity.clone(),
        tenant: ctx.tenant.clone(),
        role: selection.role,
        organization: selection.organization,
    }))
}
