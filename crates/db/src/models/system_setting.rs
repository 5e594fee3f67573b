//! System setting model and DTOs.

use jdl_core::error::CoreError;
use jdl_core::settings::SettingValue;
use jdl_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `system_settings`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SystemSetting {
    pub key: String,
    pub value: serde_json::Value,
    pub value_type: String,
    pub description: Option<String>,
    pub updated_by: Option<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SystemSetting {
    /// The stored value interpreted through its `value_type`.
    pub fn typed_value(&self) -> Result<SettingValue, CoreError> {
        SettingValue::from_stored(self.value.clone(), &self.value_type)
    }
}

/// DTO for creating a setting.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSetting {
    pub key: String,
    pub value: serde_json::Value,
    /// Inferred from `value` when omitted.
    pub value_type: Option<String>,
    pub description: Option<String>,
}

/// DTO for updating a setting.
///
/// `value: null` is kept distinct from an absent `value` so it can be rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSetting {
    #[serde(default, deserialize_with = "crate::models::deserialize_some")]
    pub value: Option<serde_json::Value>,
    pub value_type: Option<String>,
    pub description: Option<String>,
}
