use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::validate_tenant::TenantContext;
use super::validate_user::SessionContext;
use crate::access::AccessError;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::tenant::Tenant;

/// Request-scoped context handed explicitly to handlers: who is calling, and on which tenant.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub identity: Option<Identity>,
    pub tenant: Option<Tenant>,
}

impl RequestContext {
    pub fn require_identity(&self) -> Result<&Identity, AccessError> {
        self.identity.as_ref().ok_or(AccessError::Unauthenticated)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let SessionContext(identity) = parts.extensions.get::<SessionContext>().cloned().ok_or_else(|| {
            tracing::error!("Session middleware not installed on route {}", parts.uri.path());
            ApiError::internal_server_error("Session context unavailable")
        })?;

        let TenantContext(tenant) = parts.extensions.get::<TenantContext>().cloned().ok_or_else(|| {
            tracing::error!("Tenant middleware not installed on route {}", parts.uri.path());
            ApiError::internal_server_error("Tenant context unavailable")
        })?;

        Ok(Self { identity, tenant })
    }
}
