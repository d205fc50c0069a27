use axum::{
    extract::{Request, State},
    http::header::HOST,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;
use crate::tenant::Tenant;

/// Tenant serving this request, or `None` in default LMS mode
#[derive(Clone, Debug, Default)]
pub struct TenantContext(pub Option<Tenant>);

const FORWARDED_HOST: &str = "x-forwarded-host";

/// Middleware that maps the request host to a configured tenant.
/// An unknown host is not an error; the request simply carries no tenant.
pub async fn resolve_tenant_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request_host(&request, state.trust_forwarded_host);

    let tenant = host.as_deref().and_then(|h| state.tenants.resolve(h)).cloned();
    match (&tenant, host.as_deref()) {
        (Some(t), Some(h)) => tracing::debug!("Host '{}' resolved to tenant {} ({})", h, t.id, t.name),
        (None, Some(h)) => tracing::trace!("Host '{}' has no tenant; default mode", h),
        _ => tracing::trace!("Request without host header; default mode"),
    }

    request.extensions_mut().insert(TenantContext(tenant));
    next.run(request).await
}

/// Proxy-supplied host first (first entry only, and only when trusted), then Host,
/// then the URI authority.
fn request_host(request: &Request, trust_forwarded_host: bool) -> Option<String> {
    let headers = request.headers();
    let forwarded = headers
        .get(FORWARDED_HOST)
        .filter(|_| trust_forwarded_host)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|h| !h.is_empty());

    forwarded
        .or_else(|| headers.get(HOST).and_then(|v| v.to_str().ok()).map(str::trim))
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .or_else(|| request.uri().host().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(headers: &[(&str, &str)]) -> Request {
        let mut builder = axum::http::Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn forwarded_host_needs_trust() {
        let req = request(&[("host", "internal:8080"), (FORWARDED_HOST, "app.example-tenant.fr, proxy")]);
        assert_eq!(request_host(&req, false).as_deref(), Some("internal:8080"));
        assert_eq!(request_host(&req, true).as_deref(), Some("app.example-tenant.fr"));
    }

    #[test]
    fn falls_back_to_host_when_forwarded_is_blank() {
        let req = request(&[("host", "app.example-tenant.fr"), (FORWARDED_HOST, " ")]);
        assert_eq!(request_host(&req, true).as_deref(), Some("app.example-tenant.fr"));
        assert_eq!(request_host(&request(&[]), true), None);
    }
}
