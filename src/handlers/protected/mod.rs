// handlers/protected/mod.rs - endpoints that need a signed-in caller
//
// Pages answer failures with redirects (login / choice / unauthorized),
// JSON routes with 401 / 404 / 403. Both go through the same OrgResolver.

pub mod orgs;
pub mod pages;
pub mod whoami;

pub use orgs::{org_access, org_list};
pub use pages::{admin_dashboard, landing, org_entry};
pub use whoami::whoami;
