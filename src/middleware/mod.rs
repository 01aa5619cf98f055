//! Request pipeline: identity interceptor and role gate.

pub mod auth;
pub mod rbac;

pub use auth::identity_interceptor;
pub use rbac::{AccessError, AdminOnly, Authorized, MemberOrAdmin, RoleRequirement};
