use axum::extract::State;
use serde::Serialize;

use crate::access::Role;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequestContext};
use crate::state::AppState;
use crate::tenant::Tenant;

#[derive(Debug, Serialize)]
pub struct TenantList {
    pub current: Option<String>,
    pub tenants: Vec<Tenant>,
}

/// GET /api/root/tenants - every configured tenant, sorted by id
pub async fn tenant_list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<TenantList> {
    let identity = ctx.require_identity()?;
    let selection = state.roles.select(identity, ctx.tenant.as_ref()).await?;

    if selection.role != Some(Role::SuperAdmin) {
        tracing::warn!("User {} denied tenant listing", identity.user_id);
        return Err(ApiError::forbidden("Super-admin access required"));
    }

    Ok(ApiResponse::success(TenantList {
        current: ctx.tenant.map(|t| t.id),
        tenants: state.tenants.list().into_iter().cloned().collect(),
    }))
}
