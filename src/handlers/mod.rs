// handlers/mod.rs - three access tiers
//
// Public (no session) -> Protected (session required) -> Elevated (super-admin).
// Every tier reads the caller from the explicit RequestContext; none of them
// looks up the session on its own.

pub mod elevated;
pub mod protected;
pub mod public;
