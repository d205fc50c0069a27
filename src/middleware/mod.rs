pub mod context;
pub mod response;
pub mod validate_tenant;
pub mod validate_user;

pub use context::RequestContext;
pub use response::{ApiResponse, ApiResult};
pub use validate_tenant::{resolve_tenant_middleware, TenantContext};
pub use validate_user::{session_middleware, SessionContext};
