use thiserror::Error;

use crate::database::DatabaseError;

/// The single failure taxonomy for tenant/organization access.
/// Page routes turn it into redirects, JSON routes into status codes.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Organization '{0}' not found")]
    OrgNotFound(String),

    #[error("No access to organization '{0}'")]
    Forbidden(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl AccessError {
    /// Stable tag for logs and JSON bodies.
    pub fn tag(&self) -> &'static str {
        match self {
            AccessError::Unauthenticated => "UNAUTHENTICATED",
            AccessError::OrgNotFound(_) => "ORG_NOT_FOUND",
            AccessError::Forbidden(_) => "FORBIDDEN",
            AccessError::Database(_) => "DB_ERROR",
        }
    }
}
