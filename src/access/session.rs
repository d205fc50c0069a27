use serde::Serialize;
use std::cmp::Reverse;
use std::sync::Arc;

use super::error::AccessError;
use super::role::Role;
use crate::auth::Identity;
use crate::database::{Directory, Organization};
use crate::tenant::Tenant;

/// The one role used to pick a landing page, and the organization it was earned in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSelection {
    pub role: Option<Role>,
    pub organization: Option<Organization>,
}

impl RoleSelection {
    pub fn slug(&self) -> Option<&str> {
        self.organization.as_ref().map(|o| o.slug.as_str())
    }
}

/// Collapses everything a user is (super-admin, org memberships, profile role)
/// into a single deterministic role.
#[derive(Clone)]
pub struct SessionRoles {
    directory: Arc<dyn Directory>,
}

impl SessionRoles {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }

    pub async fn select(&self, identity: &Identity, tenant: Option<&Tenant>) -> Result<RoleSelection, AccessError> {
        let owns_tenant = tenant.is_some_and(|t| t.is_owned_by(&identity.email));
        if owns_tenant || self.directory.is_super_admin(identity.user_id).await? {
            return Ok(RoleSelection {
                role: Some(Role::SuperAdmin),
                organization: None,
            });
        }

        let memberships = self.directory.organizations_for_user(identity.user_id).await?;

        // Highest role first, then the alphabetically first slug among equals.
        let best = memberships
            .into_iter()
            .max_by_key(|m| (m.role, Reverse(m.organization.slug.clone())));

        let profile_role = identity.profile_role.filter(Role::is_membership_role);
        let selection = match (best, profile_role) {
            (Some(m), Some(profile)) if profile > m.role => RoleSelection {
                role: Some(profile),
                organization: None,
            },
            (Some(m), _) => RoleSelection {
                role: Some(m.role),
                organization: Some(m.organization),
            },
            (None, profile) => RoleSelection {
                role: profile,
                organization: None,
            },
        };

        tracing::debug!(
            "Selected role {:?} for user {} (organization: {:?})",
            selection.role,
            identity.user_id,
            selection.slug()
        );
        Ok(selection)
    }
}
