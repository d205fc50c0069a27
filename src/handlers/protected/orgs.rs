use axum::extract::{Path, State};

use crate::access::OrgAccess;
use crate::database::OrganizationRole;
use crate::middleware::{ApiResponse, ApiResult, RequestContext};
use crate::state::AppState;

/// GET /api/orgs - organizations the caller belongs to, sorted by slug
pub async fn org_list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<Vec<OrganizationRole>> {
    let identity = ctx.require_identity()?;
    let mut organizations = state.directory.organizations_for_user(identity.user_id).await?;
    // One entry per organization, carrying the highest role held there
    organizations.sort_by(|a, b| a.organization.slug.cmp(&b.organization.slug).then(b.role.cmp(&a.role)));
    organizations.dedup_by(|next, kept| next.organization.id == kept.organization.id);
    Ok(ApiResponse::success(organizations))
}

/// GET /api/orgs/:slug - the caller's access to one organization
///
/// 401 without a session, 404 for an unknown slug, 403 without membership.
pub async fn org_access(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(slug): Path<String>,
) -> ApiResult<OrgAccess> {
    let access = state.resolver.resolve(&slug, ctx.identity.as_ref()).await?;
    Ok(ApiResponse::success(access))
}
