use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Membership, Organization, OrganizationRole};

/// Read-only view of the relational store used by access resolution.
///
/// Every method is a point lookup; implementations must not cache across requests.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Organization with exactly this slug.
    async fn organization_by_slug(&self, slug: &str) -> Result<Option<Organization>, DatabaseError>;

    /// All membership rows for the pair. Normally zero or one, but callers must not rely on it.
    async fn memberships(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Membership>, DatabaseError>;

    /// Every organization the user belongs to, with the role held there.
    async fn organizations_for_user(&self, user_id: Uuid) -> Result<Vec<OrganizationRole>, DatabaseError>;

    async fn is_super_admin(&self, user_id: Uuid) -> Result<bool, DatabaseError>;

    /// Connectivity check for `/health`.
    async fn ping(&self) -> Result<(), DatabaseError>;

    /// Release connections on shutdown.
    async fn close(&self) {}
}
