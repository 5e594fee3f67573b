pub mod class_change;
pub mod dashboard;
pub mod entry;
pub mod notification;
pub mod page;
pub mod player;
pub mod system_setting;
pub mod team;
pub mod team_permission;
pub mod tournament;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Deserialize a present field as `Some`, so `null` becomes `Some(None)` for
/// `Option<Option<T>>` and an absent field stays `None` via `#[serde(default)]`.
pub(crate) fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
