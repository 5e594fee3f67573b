//! Request handlers, one submodule per resource.
//!
//! Handlers authenticate via the extractors in [`crate::middleware`], run the
//! validation rules from `jdl_core`, and delegate persistence (and any check
//! that must happen under a row lock) to the repositories in `jdl_db`.

pub mod admin;
pub mod class_changes;
pub mod entries;
pub mod import;
pub mod me;
pub mod notifications;
pub mod permissions;
pub mod players;
pub mod settings;
pub mod teams;
pub mod tournaments;
pub mod users;

use jdl_core::error::CoreError;
use jdl_core::history::DateRange;
use jdl_core::settings::{KEY_DEFAULT_ENTRY_FEE, KEY_MAX_TEAM_MEMBERS};
use jdl_core::types::Timestamp;
use jdl_db::models::team::Team;
use jdl_db::repositories::{SystemSettingRepo, TeamRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub(crate) fn not_found(entity: &'static str, id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity,
        id: id.to_string(),
    })
}

/// Load a team, returning NotFound if it does not exist.
pub(crate) async fn ensure_team_exists(pool: &PgPool, id: &str) -> AppResult<Team> {
    TeamRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found("Team", id))
}

/// Reject a history range whose start is after its end.
pub(crate) fn check_range(from: Option<Timestamp>, to: Option<Timestamp>) -> AppResult<()> {
    DateRange::new(from, to)?;
    Ok(())
}

/// The configured team size cap.
pub(crate) async fn max_team_members(pool: &PgPool) -> AppResult<i64> {
    let setting = SystemSettingRepo::find_value(pool, KEY_MAX_TEAM_MEMBERS).await?;
    Ok(jdl_core::settings::max_team_members(setting.as_ref()))
}

/// The configured default tournament entry fee.
pub(crate) async fn default_entry_fee(pool: &PgPool) -> AppResult<i32> {
    let setting = SystemSettingRepo::find_value(pool, KEY_DEFAULT_ENTRY_FEE).await?;
    Ok(jdl_core::settings::default_entry_fee(setting.as_ref()))
}
