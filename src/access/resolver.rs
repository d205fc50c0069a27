use serde::Serialize;
use std::sync::Arc;

use super::dispatch::is_valid_slug;
use super::error::AccessError;
use super::role::Role;
use crate::auth::Identity;
use crate::database::{Directory, Organization};

/// A caller's resolved access to one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgAccess {
    pub organization: Organization,
    pub role: Role,
}

impl OrgAccess {
    /// Fails with `Forbidden` unless the resolved role is one of `allowed`.
    /// Super-admins always pass.
    pub fn require(self, allowed: &[Role]) -> Result<Self, AccessError> {
        if self.role == Role::SuperAdmin || allowed.contains(&self.role) {
            Ok(self)
        } else {
            tracing::warn!(
                "Role {} is not allowed here in organization '{}'",
                self.role,
                self.organization.slug
            );
            Err(AccessError::Forbidden(self.organization.slug))
        }
    }
}

/// Slug -> organization -> membership, the one guard every org-scoped route uses.
#[derive(Clone)]
pub struct OrgResolver {
    directory: Arc<dyn Directory>,
}

impl OrgResolver {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }

    pub async fn resolve(&self, slug: &str, identity: Option<&Identity>) -> Result<OrgAccess, AccessError> {
        let identity = identity.ok_or(AccessError::Unauthenticated)?;

        if !is_valid_slug(slug) {
            tracing::debug!("Rejecting malformed organization slug '{}'", slug);
            return Err(AccessError::OrgNotFound(slug.to_string()));
        }

        let organization = match self.directory.organization_by_slug(slug).await? {
            Some(org) => org,
            None => {
                tracing::warn!("Organization '{}' not found", slug);
                return Err(AccessError::OrgNotFound(slug.to_string()));
            }
        };

        // Super-admin outranks any membership role, so it is checked first
        if self.directory.is_super_admin(identity.user_id).await? {
            tracing::debug!("Super-admin {} entering '{}'", identity.user_id, organization.slug);
            return Ok(OrgAccess {
                organization,
                role: Role::SuperAdmin,
            });
        }

        let memberships = self.directory.memberships(organization.id, identity.user_id).await?;
        if memberships.len() > 1 {
            tracing::warn!(
                "User {} has {} membership rows in organization '{}'; using the highest role",
                identity.user_id,
                memberships.len(),
                organization.slug
            );
        }

        if let Some(role) = Role::highest(memberships.iter().map(|m| m.role)) {
            tracing::debug!("User {} is {} in '{}'", identity.user_id, role, organization.slug);
            return Ok(OrgAccess { organization, role });
        }

        tracing::warn!("User {} has no membership in '{}'", identity.user_id, organization.slug);
        Err(AccessError::Forbidden(organization.slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{DatabaseError, MemoryDirectory, Membership, OrganizationRole};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    /// Wraps a directory and counts membership lookups.
    struct Counting {
        inner: MemoryDirectory,
        membership_calls: AtomicUsize,
    }

    #[async_trait]
    impl Directory for Counting {
        async fn organization_by_slug(&self, slug: &str) -> Result<Option<Organization>, DatabaseError> {
            self.inner.organization_by_slug(slug).await
        }
        async fn memberships(&self, org: Uuid, user: Uuid) -> Result<Vec<Membership>, DatabaseError> {
            self.membership_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.memberships(org, user).await
        }
        async fn organizations_for_user(&self, user: Uuid) -> Result<Vec<OrganizationRole>, DatabaseError> {
            self.inner.organizations_for_user(user).await
        }
        async fn is_super_admin(&self, user: Uuid) -> Result<bool, DatabaseError> {
            self.inner.is_super_admin(user).await
        }
        async fn ping(&self) -> Result<(), DatabaseError> {
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl Directory for Failing {
        async fn organization_by_slug(&self, _: &str) -> Result<Option<Organization>, DatabaseError> {
            Err(DatabaseError::ConfigMissing("DATABASE_URL"))
        }
        async fn memberships(&self, _: Uuid, _: Uuid) -> Result<Vec<Membership>, DatabaseError> {
            unreachable!()
        }
        async fn organizations_for_user(&self, _: Uuid) -> Result<Vec<OrganizationRole>, DatabaseError> {
            unreachable!()
        }
        async fn is_super_admin(&self, _: Uuid) -> Result<bool, DatabaseError> {
            unreachable!()
        }
        async fn ping(&self) -> Result<(), DatabaseError> {
            Err(DatabaseError::ConfigMissing("DATABASE_URL"))
        }
    }

    fn user() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "someone@acme.test".to_string(),
            profile_role: None,
        }
    }

    fn counting(inner: MemoryDirectory) -> Arc<Counting> {
        Arc::new(Counting {
            inner,
            membership_calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn anonymous_is_unauthenticated() {
        let dir = counting(MemoryDirectory::new());
        let resolver = OrgResolver::new(dir.clone());
        assert!(matches!(resolver.resolve("acme", None).await, Err(AccessError::Unauthenticated)));
    }

    #[tokio::test]
    async fn missing_org_never_reaches_membership_lookup() {
        let dir = counting(MemoryDirectory::new());
        let resolver = OrgResolver::new(dir.clone());
        let err = resolver.resolve("acme", Some(&user())).await.unwrap_err();
        assert!(matches!(err, AccessError::OrgNotFound(ref s) if s == "acme"));
        assert_eq!(dir.membership_calls.load(Ordering::SeqCst), 0);

        let err = resolver.resolve("Not A Slug", Some(&user())).await.unwrap_err();
        assert!(matches!(err, AccessError::OrgNotFound(_)));
        assert_eq!(dir.membership_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_membership_is_forbidden() {
        let (mem, _) = MemoryDirectory::new().with_organization("acme", "Acme");
        let dir = counting(mem);
        let resolver = OrgResolver::new(dir.clone());
        let err = resolver.resolve("acme", Some(&user())).await.unwrap_err();
        assert!(matches!(err, AccessError::Forbidden(ref s) if s == "acme"));
        assert_eq!(dir.membership_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn member_gets_role() {
        let me = user();
        let (mem, acme) = MemoryDirectory::new().with_organization("acme", "Acme");
        let resolver = OrgResolver::new(Arc::new(mem.with_membership(acme, me.user_id, Role::Admin)));
        let access = resolver.resolve("acme", Some(&me)).await.unwrap();
        assert_eq!(access.role, Role::Admin);
        assert_eq!(access.organization.slug, "acme");
    }

    #[tokio::test]
    async fn duplicate_rows_pick_highest_role_in_any_order() {
        let me = user();
        let (mem, acme) = MemoryDirectory::new().with_organization("acme", "Acme");
        let a = mem
            .clone()
            .with_membership(acme, me.user_id, Role::Learner)
            .with_membership(acme, me.user_id, Role::Instructor);
        let b = mem
            .with_membership(acme, me.user_id, Role::Instructor)
            .with_membership(acme, me.user_id, Role::Learner);

        let ra = OrgResolver::new(Arc::new(a)).resolve("acme", Some(&me)).await.unwrap();
        let rb = OrgResolver::new(Arc::new(b)).resolve("acme", Some(&me)).await.unwrap();
        assert_eq!(ra.role, Role::Instructor);
        assert_eq!(ra.role, rb.role);
    }

    #[tokio::test]
    async fn super_admin_enters_any_existing_org() {
        let me = user();
        let (mem, _) = MemoryDirectory::new().with_organization("acme", "Acme");
        let resolver = OrgResolver::new(Arc::new(mem.with_super_admin(me.user_id)));
        let access = resolver.resolve("acme", Some(&me)).await.unwrap();
        assert_eq!(access.role, Role::SuperAdmin);
        assert!(matches!(
            resolver.resolve("ghost", Some(&me)).await,
            Err(AccessError::OrgNotFound(_))
        ));
    }

    #[tokio::test]
    async fn super_admin_with_learner_membership_stays_super_admin() {
        let me = user();
        let (mem, acme) = MemoryDirectory::new().with_organization("acme", "Acme");
        let dir = mem.with_membership(acme, me.user_id, Role::Learner).with_super_admin(me.user_id);
        let access = OrgResolver::new(Arc::new(dir)).resolve("acme", Some(&me)).await.unwrap();
        assert_eq!(access.role, Role::SuperAdmin);
        assert!(access.require(&[Role::Admin]).is_ok());
    }

    #[tokio::test]
    async fn profile_role_claim_is_not_super_admin() {
        let mut me = user();
        me.profile_role = Some(Role::SuperAdmin);
        let (mem, _) = MemoryDirectory::new().with_organization("acme", "Acme");
        assert!(matches!(
            OrgResolver::new(Arc::new(mem)).resolve("acme", Some(&me)).await,
            Err(AccessError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn store_failure_is_database_error() {
        let resolver = OrgResolver::new(Arc::new(Failing));
        assert!(matches!(
            resolver.resolve("acme", Some(&user())).await,
            Err(AccessError::Database(_))
        ));
    }

    #[test]
    fn require_checks_role() {
        let org = Organization {
            id: Uuid::new_v4(),
            slug: "acme".to_string(),
            name: "Acme".to_string(),
        };
        let learner = OrgAccess { organization: org.clone(), role: Role::Learner };
        assert!(matches!(learner.require(&[Role::Admin]), Err(AccessError::Forbidden(_))));

        let admin = OrgAccess { organization: org.clone(), role: Role::Admin };
        assert!(admin.require(&[Role::Admin]).is_ok());

        let root = OrgAccess { organization: org, role: Role::SuperAdmin };
        assert!(root.require(&[Role::Instructor]).is_ok());
    }
}
