pub mod access;
pub mod route;
pub mod tenants;
pub mod token;
