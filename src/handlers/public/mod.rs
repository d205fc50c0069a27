// handlers/public/mod.rs - endpoints reachable without a session
//
// Service info plus the session cookie bridge (sign-in happens at the
// external auth provider; we only accept the token it hands back).

pub mod info;
pub mod session;

pub use info::{api_info, health};
pub use session::{logout, session_create};
