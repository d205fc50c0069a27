use std::sync::Arc;

use crate::access::{OrgResolver, SessionRoles};
use crate::config::SessionSettings;
use crate::database::Directory;
use crate::tenant::TenantRegistry;

/// Shared, read-only handles every handler and middleware gets through `State`.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn Directory>,
    pub tenants: Arc<TenantRegistry>,
    pub session: Arc<SessionSettings>,
    pub resolver: OrgResolver,
    pub roles: SessionRoles,
    /// Take the tenant host from `X-Forwarded-Host` when present
    pub trust_forwarded_host: bool,
}

impl AppState {
    pub fn new(directory: Arc<dyn Directory>, tenants: TenantRegistry, session: SessionSettings) -> Self {
        Self {
            resolver: OrgResolver::new(directory.clone()),
            roles: SessionRoles::new(directory.clone()),
            directory,
            tenants: Arc::new(tenants),
            session: Arc::new(session),
            trust_forwarded_host: false,
        }
    }

    pub fn trusting_forwarded_host(mut self, trust: bool) -> Self {
        self.trust_forwarded_host = trust;
        self
    }
}
