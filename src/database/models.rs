use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::access::Role;

/// Customer workspace addressed by its unique slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
}

/// A user's role inside one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
}

/// An organization paired with the caller's role in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRole {
    pub organization: Organization,
    pub role: Role,
}

/// Raw `memberships` row; the role column is free text in the store.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipRow {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
}

impl MembershipRow {
    /// Typed membership, or `None` when the role text is not one of the membership roles.
    pub fn into_membership(self) -> Option<Membership> {
        match self.role.parse::<Role>() {
            Ok(role) if role.is_membership_role() => Some(Membership {
                organization_id: self.organization_id,
                user_id: self.user_id,
                role,
            }),
            _ => {
                tracing::warn!(
                    "Skipping membership of user {} in organization {}: unsupported role '{}'",
                    self.user_id,
                    self.organization_id,
                    self.role
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(role: &str) -> MembershipRow {
        MembershipRow {
            organization_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: role.to_string(),
        }
    }

    #[test]
    fn membership_row_parses_role() {
        let m = row("formateur").into_membership().unwrap();
        assert_eq!(m.role, Role::Instructor);
    }

    #[test]
    fn membership_row_rejects_unknown_and_super_admin() {
        assert!(row("owner").into_membership().is_none());
        assert!(row("super-admin").into_membership().is_none());
    }
}
