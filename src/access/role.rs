use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse permission level used to gate pages and pick redirect targets.
///
/// Variants are declared from lowest to highest priority so the derived `Ord`
/// is the tie-break order: super-admin > admin > instructor > tutor > learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Learner,
    Tutor,
    Instructor,
    Admin,
    SuperAdmin,
}

/// Roles a membership row may carry. Super-admin is never an org membership.
pub const MEMBERSHIP_ROLES: [Role; 4] = [Role::Admin, Role::Instructor, Role::Tutor, Role::Learner];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Learner => "learner",
            Role::Tutor => "tutor",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
            Role::SuperAdmin => "super-admin",
        }
    }

    /// Highest-priority role of the iterator, if any.
    pub fn highest<I>(roles: I) -> Option<Role>
    where
        I: IntoIterator<Item = Role>,
    {
        roles.into_iter().max()
    }

    pub fn is_membership_role(&self) -> bool {
        MEMBERSHIP_ROLES.contains(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Accepts the canonical names plus the French labels still stored in older rows.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "learner" | "apprenant" | "student" => Ok(Role::Learner),
            "tutor" | "tuteur" => Ok(Role::Tutor),
            "instructor" | "formateur" | "trainer" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            "super-admin" | "super_admin" | "superadmin" => Ok(Role::SuperAdmin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
