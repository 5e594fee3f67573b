//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Verifies the Bearer credential and loads the user record.
//! - [`rbac::RequireAdmin`] -- Requires an effective admin.
//! - [`rbac::RequireAuth`] -- Requires any authenticated, unlocked user.

pub mod auth;
pub mod rbac;
