//! Who may see what, and where they land.
//!
//! `SessionRoles` picks a single role for a signed-in user, `OrgResolver` checks
//! access to a slug-addressed organization, and `dispatch` maps the outcome to a
//! path. All failures share `AccessError`.

pub mod dispatch;
pub mod error;
pub mod resolver;
pub mod role;
pub mod session;

pub use dispatch::{destination, destination_for, failure_destination};
pub use error::AccessError;
pub use resolver::{OrgAccess, OrgResolver};
pub use role::Role;
pub use session::{RoleSelection, SessionRoles};
