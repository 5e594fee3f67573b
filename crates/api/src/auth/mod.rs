//! Credential verification.
//!
//! - [`jwt`] -- identity-provider credential validation (and issuance for
//!   tests and local development).

pub mod jwt;
