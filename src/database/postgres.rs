use async_trait::async_trait;
use sqlx::FromRow;
use std::sync::Arc;
use uuid::Uuid;

use super::directory::Directory;
use super::manager::{DatabaseError, DatabaseManager};
use super::models::{Membership, MembershipRow, Organization, OrganizationRole};

/// `Directory` backed by the `organizations`, `memberships` and `super_admins` tables.
pub struct PgDirectory {
    manager: Arc<DatabaseManager>,
}

#[derive(FromRow)]
struct OrganizationRoleRow {
    id: Uuid,
    slug: String,
    name: String,
    role: String,
}

impl PgDirectory {
    pub fn new(manager: Arc<DatabaseManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Directory for PgDirectory {
    async fn organization_by_slug(&self, slug: &str) -> Result<Option<Organization>, DatabaseError> {
        let pool = self.manager.pool().await?;
        let org = sqlx::query_as::<_, Organization>(
            "SELECT id, slug, name FROM organizations WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;
        Ok(org)
    }

    async fn memberships(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Membership>, DatabaseError> {
        let pool = self.manager.pool().await?;
        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT organization_id, user_id, role
            FROM memberships
            WHERE organization_id = $1
            AND user_id = $2
            "#,
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().filter_map(MembershipRow::into_membership).collect())
    }

    async fn organizations_for_user(&self, user_id: Uuid) -> Result<Vec<OrganizationRole>, DatabaseError> {
        let pool = self.manager.pool().await?;
        let rows = sqlx::query_as::<_, OrganizationRoleRow>(
            r#"
            SELECT o.id, o.slug, o.name, m.role
            FROM memberships m
            JOIN organizations o ON o.id = m.organization_id
            WHERE m.user_id = $1
            ORDER BY o.slug
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let organizations = rows
            .into_iter()
            .filter_map(|row| {
                let membership = MembershipRow {
                    organization_id: row.id,
                    user_id,
                    role: row.role,
                }
                .into_membership()?;
                Some(OrganizationRole {
                    organization: Organization {
                        id: row.id,
                        slug: row.slug,
                        name: row.name,
                    },
                    role: membership.role,
                })
            })
            .collect();

        Ok(organizations)
    }

    async fn is_super_admin(&self, user_id: Uuid) -> Result<bool, DatabaseError> {
        let pool = self.manager.pool().await?;
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM super_admins WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.manager.health_check().await
    }

    async fn close(&self) {
        self.manager.close().await
    }
}
