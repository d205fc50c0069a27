use axum::{
    extract::{Path, State},
    http::Uri,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use crate::access::{destination, dispatch::LOGIN_PATH, failure_destination, AccessError, OrgAccess, Role};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, RequestContext};
use crate::state::AppState;
use crate::tenant::Tenant;

/// Access failure on a page route: redirect when there is somewhere to go,
/// otherwise the JSON error.
#[derive(Debug)]
pub struct PageRejection {
    error: AccessError,
    requested_path: String,
}

impl PageRejection {
    fn new(error: AccessError, uri: &Uri) -> Self {
        Self {
            error,
            requested_path: uri.path().to_string(),
        }
    }
}

impl IntoResponse for PageRejection {
    fn into_response(self) -> Response {
        match failure_destination(&self.error, &self.requested_path) {
            Some(to) => {
                tracing::debug!("{} on {} -> {}", self.error.tag(), self.requested_path, to);
                Redirect::to(&to).into_response()
            }
            None => ApiError::from(self.error).into_response(),
        }
    }
}

/// GET / - send the caller to the landing page for their role
pub async fn landing(State(state): State<AppState>, ctx: RequestContext) -> Result<Redirect, ApiError> {
    let Some(identity) = ctx.identity.as_ref() else {
        return Ok(Redirect::to(LOGIN_PATH));
    };

    let selection = state.roles.select(identity, ctx.tenant.as_ref()).await?;
    Ok(Redirect::to(&destination(selection.role, selection.slug())))
}

/// GET /org/:slug - enter an organization and land on the page for the role held there
pub async fn org_entry(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(slug): Path<String>,
    uri: Uri,
) -> Result<Redirect, PageRejection> {
    let access = state
        .resolver
        .resolve(&slug, ctx.identity.as_ref())
        .await
        .map_err(|e| PageRejection::new(e, &uri))?;

    Ok(Redirect::to(&destination(Some(access.role), Some(&access.organization.slug))))
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    #[serde(flatten)]
    pub access: OrgAccess,
    pub tenant: Option<Tenant>,
}

/// GET /admin/:slug/dashboard - admin home of an organization
///
/// Rendering is the frontend's job; this returns the page model once the
/// caller has been checked.
pub async fn admin_dashboard(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(slug): Path<String>,
    uri: Uri,
) -> Result<ApiResponse<AdminDashboard>, PageRejection> {
    let access = state
        .resolver
        .resolve(&slug, ctx.identity.as_ref())
        .await
        .and_then(|access| access.require(&[Role::Admin]))
        .map_err(|e| PageRejection::new(e, &uri))?;

    Ok(ApiResponse::success(AdminDashboard {
        access,
        tenant: ctx.tenant,
    }))
}
