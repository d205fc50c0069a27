// Redirect targets for a classified request.
//
// Everything here is a pure function of its inputs: no lookups, no logging.

use super::error::AccessError;
use super::role::Role;

pub const DEFAULT_DESTINATION: &str = "/dashboard";
pub const LOGIN_PATH: &str = "/login";
pub const CHOICE_PATH: &str = "/choice";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

const SLUG_MAX: usize = 63;

/// Destination path for a role, optionally scoped to an organization slug.
///
/// Malformed slugs are treated as absent so a bad value can never end up
/// spliced into a Location header.
pub fn destination(role: Option<Role>, org_slug: Option<&str>) -> String {
    let slug = org_slug.filter(|s| is_valid_slug(s));

    match role {
        Some(Role::SuperAdmin) => "/super-admin/dashboard".to_string(),
        Some(Role::Admin) => match slug {
            Some(slug) => format!("/admin/{}/dashboard", slug),
            None => "/dashboard/admin".to_string(),
        },
        Some(Role::Instructor) => "/dashboard/formateur".to_string(),
        Some(Role::Tutor) => "/dashboard/tuteur".to_string(),
        Some(Role::Learner) => "/dashboard/apprenant".to_string(),
        None => DEFAULT_DESTINATION.to_string(),
    }
}

/// Same as [`destination`] for a raw role name; unknown names get the default path.
pub fn destination_for(raw_role: &str, org_slug: Option<&str>) -> String {
    destination(raw_role.parse().ok(), org_slug)
}

/// Where a page request goes when access resolution fails.
/// Store failures are not redirected; callers surface them as HTTP 500.
pub fn failure_destination(error: &AccessError, requested_path: &str) -> Option<String> {
    match error {
        AccessError::Unauthenticated => {
            let next: String = url::form_urlencoded::byte_serialize(requested_path.as_bytes()).collect();
            Some(format!("{}?next={}", LOGIN_PATH, next))
        }
        AccessError::OrgNotFound(_) => Some(CHOICE_PATH.to_string()),
        AccessError::Forbidden(_) => Some(UNAUTHORIZED_PATH.to_string()),
        AccessError::Database(_) => None,
    }
}

/// Organization slugs are lowercase ASCII alphanumerics and inner hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= SLUG_MAX
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseError;

    #[test]
    fn admin_with_slug_goes_to_org_dashboard() {
        assert_eq!(destination(Some(Role::Admin), Some("acme")), "/admin/acme/dashboard");
        assert_eq!(destination_for("admin", Some("acme")), "/admin/acme/dashboard");
    }

    #[test]
    fn role_table() {
        assert_eq!(destination(Some(Role::SuperAdmin), Some("acme")), "/super-admin/dashboard");
        assert_eq!(destination(Some(Role::Admin), None), "/dashboard/admin");
        assert_eq!(destination(Some(Role::Instructor), Some("acme")), "/dashboard/formateur");
        assert_eq!(destination(Some(Role::Tutor), None), "/dashboard/tuteur");
        assert_eq!(destination(Some(Role::Learner), None), "/dashboard/apprenant");
    }

    #[test]
    fn unknown_role_gets_default() {
        assert_eq!(destination(None, Some("acme")), DEFAULT_DESTINATION);
        assert_eq!(destination_for("owner", Some("acme")), DEFAULT_DESTINATION);
        assert_eq!(destination_for("", None), DEFAULT_DESTINATION);
    }

    #[test]
    fn same_input_same_output() {
        for role in [None, Some(Role::Admin), Some(Role::Learner)] {
            for slug in [None, Some("acme"), Some("beta-2")] {
                assert_eq!(destination(role, slug), destination(role, slug));
            }
        }
    }

    #[test]
    fn malformed_slug_is_dropped() {
        assert_eq!(destination(Some(Role::Admin), Some("../etc")), "/dashboard/admin");
        assert_eq!(destination(Some(Role::Admin), Some("Acme")), "/dashboard/admin");
        assert_eq!(destination(Some(Role::Admin), Some("")), "/dashboard/admin");
    }

    #[test]
    fn slug_rules() {
        assert!(is_valid_slug("acme"));
        assert!(is_valid_slug("acme-formation-2"));
        assert!(!is_valid_slug("-acme"));
        assert!(!is_valid_slug("acme-"));
        assert!(!is_valid_slug("acme corp"));
        assert!(!is_valid_slug(&"a".repeat(64)));
    }

    #[test]
    fn failure_redirects() {
        assert_eq!(
            failure_destination(&AccessError::Unauthenticated, "/admin/acme/dashboard").as_deref(),
            Some("/login?next=%2Fadmin%2Facme%2Fdashboard")
        );
        assert_eq!(
            failure_destination(&AccessError::OrgNotFound("acme".into()), "/org/acme").as_deref(),
            Some(CHOICE_PATH)
        );
        assert_eq!(
            failure_destination(&AccessError::Forbidden("acme".into()), "/org/acme").as_deref(),
            Some(UNAUTHORIZED_PATH)
        );
        let db = AccessError::Database(DatabaseError::ConfigMissing("DATABASE_URL"));
        assert_eq!(failure_destination(&db, "/"), None);
    }
}
