//! Repository for the `system_settings` table.

use jdl_core::error::CoreError;
use jdl_core::settings::SettingValue;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::system_setting::SystemSetting;

const COLUMNS: &str = "key, value, value_type, description, updated_by, created_at, updated_at";

/// Provides read and write access to system settings. Settings are never
/// deleted.
pub struct SystemSettingRepo;

impl SystemSettingRepo {
    /// All settings ordered by key.
    pub async fn list(pool: &PgPool) -> Result<Vec<SystemSetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM system_settings ORDER BY key ASC");
        sqlx::query_as::<_, SystemSetting>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_key(
        pool: &PgPool,
        key: &str,
    ) -> Result<Option<SystemSetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM system_settings WHERE key = $1");
        sqlx::query_as::<_, SystemSetting>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// The typed value of a setting, if it is set.
    pub async fn find_value(pool: &PgPool, key: &str) -> RepoResult<Option<SettingValue>> {
        let Some(setting) = Self::find_by_key(pool, key).await? else {
            return Ok(None);
        };
        let value = setting.typed_value().map_err(|e| {
            CoreError::Internal(format!("Stored setting '{key}' is unreadable: {e}"))
        })?;
        Ok(Some(value))
    }

    /// Insert a new setting. A duplicate key violates `uq_system_settings_key`.
    pub async fn create(
        pool: &PgPool,
        key: &str,
        value: &SettingValue,
        description: Option<&str>,
        updated_by: &str,
    ) -> Result<SystemSetting, sqlx::Error> {
        let query = format!(
            "INSERT INTO system_settings (key, value, value_type, description, updated_by) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SystemSetting>(&query)
            .bind(key)
            .bind(value.to_json())
            .bind(value.setting_type().as_str())
            .bind(description)
            .bind(updated_by)
            .fetch_one(pool)
            .await
    }

    /// Update a setting's value and/or description.
    ///
    /// Returns `None` if no setting with the given `key` exists.
    pub async fn update(
        pool: &PgPool,
        key: &str,
        value: Option<&SettingValue>,
        description: Option<&str>,
        updated_by: &str,
    ) -> Result<Option<SystemSetting>, sqlx::Error> {
        let query = format!(
            "UPDATE system_settings SET \
                value = COALESCE($2, value), \
                value_type = COALESCE($3, value_type), \
                description = COALESCE($4, description), \
                updated_by = $5 \
             WHERE key = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SystemSetting>(&query)
            .bind(key)
            .bind(value.map(SettingValue::to_json))
            .bind(value.map(|v| v.setting_type().as_str()))
            .bind(description)
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }
}
