//! Drone league API server library.
//!
//! Exposes config, state, error handling, extractors and routes so that
//! integration tests and the binary entrypoint build the same application.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
