// handlers/elevated/mod.rs - platform-wide endpoints (super-admin only)
//
// Route Prefix: /api/root/*
// Access: session identity that resolves to SuperAdmin for the current tenant
// (platform super-admin flag, or owner of the tenant the request came in on).

pub mod tenants;

pub use tenants::tenant_list;
