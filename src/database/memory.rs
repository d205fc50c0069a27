use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

use super::directory::Directory;
use super::manager::DatabaseError;
use super::models::{Membership, Organization, OrganizationRole};
use crate::access::Role;

/// In-process directory seeded from YAML fixtures.
///
/// Used by `DIRECTORY_BACKEND=memory` for local development and by the test suites.
/// Rows keep insertion order, duplicates included, so callers see the same shapes
/// they would get from the database.
#[derive(Debug, Default, Clone)]
pub struct MemoryDirectory {
    organizations: Vec<Organization>,
    memberships: Vec<Membership>,
    super_admins: HashSet<Uuid>,
}

#[derive(Debug, Deserialize)]
struct Fixtures {
    #[serde(default)]
    organizations: Vec<OrganizationFixture>,
    #[serde(default)]
    memberships: Vec<MembershipFixture>,
    #[serde(default)]
    super_admins: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
struct OrganizationFixture {
    id: Option<Uuid>,
    slug: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct MembershipFixture {
    organization: String,
    user_id: Uuid,
    role: String,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DatabaseError> {
        let fixtures: Fixtures =
            serde_yaml::from_str(yaml).map_err(|e| DatabaseError::InvalidFixture(e.to_string()))?;

        let mut directory = Self::new();
        for org in fixtures.organizations {
            if directory.organizations.iter().any(|o| o.slug == org.slug) {
                return Err(DatabaseError::InvalidFixture(format!("duplicate organization slug '{}'", org.slug)));
            }
            directory.organizations.push(Organization {
                id: org.id.unwrap_or_else(Uuid::new_v4),
                slug: org.slug,
                name: org.name,
            });
        }

        for m in fixtures.memberships {
            let organization_id = directory
                .organizations
                .iter()
                .find(|o| o.slug == m.organization)
                .map(|o| o.id)
                .ok_or_else(|| {
                    DatabaseError::InvalidFixture(format!("membership references unknown organization '{}'", m.organization))
                })?;
            let role = m
                .role
                .parse::<Role>()
                .ok()
                .filter(Role::is_membership_role)
                .ok_or_else(|| DatabaseError::InvalidFixture(format!("unsupported membership role '{}'", m.role)))?;
            directory.memberships.push(Membership {
                organization_id,
                user_id: m.user_id,
                role,
            });
        }

        directory.super_admins.extend(fixtures.super_admins);
        Ok(directory)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| DatabaseError::InvalidFixture(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&yaml)
    }

    pub fn with_organization(mut self, slug: &str, name: &str) -> (Self, Uuid) {
        let id = Uuid::new_v4();
        self.organizations.push(Organization {
            id,
            slug: slug.to_string(),
            name: name.to_string(),
        });
        (self, id)
    }

    pub fn with_membership(mut self, organization_id: Uuid, user_id: Uuid, role: Role) -> Self {
        self.memberships.push(Membership {
            organization_id,
            user_id,
            role,
        });
        self
    }

    pub fn with_super_admin(mut self, user_id: Uuid) -> Self {
        self.super_admins.insert(user_id);
        self
    }

    pub fn organization(&self, slug: &str) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.slug == slug)
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn organization_by_slug(&self, slug: &str) -> Result<Option<Organization>, DatabaseError> {
        Ok(self.organization(slug).cloned())
    }

    async fn memberships(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Membership>, DatabaseError> {
        Ok(self
            .memberships
            .iter()
            .filter(|m| m.organization_id == organization_id && m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn organizations_for_user(&self, user_id: Uuid) -> Result<Vec<OrganizationRole>, DatabaseError> {
        Ok(self
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| {
                self.organizations
                    .iter()
                    .find(|o| o.id == m.organization_id)
                    .map(|o| OrganizationRole {
                        organization: o.clone(),
                        role: m.role,
                    })
            })
            .collect())
    }

    async fn is_super_admin(&self, user_id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.super_admins.contains(&user_id))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURES: &str = r#"
organizations:
  - id: "6f1c2a9e-0d7b-4c55-9a43-0f6f3b5c8a01"
    slug: acme
    name: Acme Formation
  - slug: beta
    name: Beta Academy
memberships:
  - organization: acme
    user_id: "0b8e6a54-4a3f-4d9e-8f0a-1c2d3e4f5a61"
    role: admin
  - organization: beta
    user_id: "0b8e6a54-4a3f-4d9e-8f0a-1c2d3e4f5a61"
    role: apprenant
super_admins:
  - "9d2f7c10-5b8e-4e6a-a1b2-c3d4e5f60718"
"#;

    #[tokio::test]
    async fn loads_fixtures() {
        let dir = MemoryDirectory::from_yaml_str(FIXTURES).unwrap();
        let acme = dir.organization_by_slug("acme").await.unwrap().unwrap();
        assert_eq!(acme.name, "Acme Formation");

        let user: Uuid = "0b8e6a54-4a3f-4d9e-8f0a-1c2d3e4f5a61".parse().unwrap();
        let rows = dir.memberships(acme.id, user).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role, Role::Admin);

        let orgs = dir.organizations_for_user(user).await.unwrap();
        assert_eq!(orgs.len(), 2);
        assert_eq!(orgs[1].role, Role::Learner);

        let root: Uuid = "9d2f7c10-5b8e-4e6a-a1b2-c3d4e5f60718".parse().unwrap();
        assert!(dir.is_super_admin(root).await.unwrap());
        assert!(!dir.is_super_admin(user).await.unwrap());
    }

    #[test]
    fn rejects_bad_fixtures() {
        let unknown_org = r#"
memberships:
  - organization: nowhere
    user_id: "0b8e6a54-4a3f-4d9e-8f0a-1c2d3e4f5a61"
    role: admin
"#;
        assert!(matches!(
            MemoryDirectory::from_yaml_str(unknown_org),
            Err(DatabaseError::InvalidFixture(_))
        ));

        let bad_role = r#"
organizations:
  - slug: acme
    name: Acme
memberships:
  - organization: acme
    user_id: "0b8e6a54-4a3f-4d9e-8f0a-1c2d3e4f5a61"
    role: owner
"#;
        assert!(MemoryDirectory::from_yaml_str(bad_role).is_err());

        let dup = "organizations:\n  - {slug: acme, name: A}\n  - {slug: acme, name: B}\n";
        assert!(MemoryDirectory::from_yaml_str(dup).is_err());
    }
}
