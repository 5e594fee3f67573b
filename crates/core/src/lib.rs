//! Domain rules for the drone league backend: validation, status lifecycles,
//! permission bookkeeping, settings coercion, notification wording and
//! master-data parsing.
//!
//! Nothing in this crate performs I/O.

#[macro_use]
mod macros;

pub mod actor;
pub mod class;
pub mod entry;
pub mod error;
pub mod history;
pub mod import;
pub mod integrity;
pub mod notification;
pub mod pagination;
pub mod permission;
pub mod settings;
pub mod status;
pub mod types;
pub mod validation;
