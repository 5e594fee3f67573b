//! Typed system-setting values.
//!
//! Settings are stored as JSON with a companion `value_type`. Incoming values
//! are coerced to the declared type (or inferred when none is declared) so a
//! stored setting always round-trips as the same kind of value.

use serde_json::Value;

use crate::error::CoreError;

/// Setting read when a tournament is created without an entry fee.
pub const KEY_DEFAULT_ENTRY_FEE: &str = "default_entry_fee";
/// Setting capping the number of active players on one team.
pub const KEY_MAX_TEAM_MEMBERS: &str = "max_team_members";

/// Team size cap used when `max_team_members` is unset.
pub const DEFAULT_MAX_TEAM_MEMBERS: i64 = 8;

define_str_enum! {
    /// Declared kind of a setting value.
    SettingType ("setting type") {
        String => "string",
        Number => "number",
        Boolean => "boolean",
        Structured => "structured",
    }
}

/// A setting value, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    String(String),
    Number(serde_json::Number),
    Boolean(bool),
    /// A JSON object or array.
    Structured(Value),
}

impl SettingValue {
    /// Build a value from raw JSON, coercing to `hint` when given.
    ///
    /// Without a hint the kind is inferred from the JSON. `null` is never a
    /// valid setting value.
    pub fn from_json(value: Value, hint: Option<SettingType>) -> Result<Self, CoreError> {
        let invalid = |expected: &str| {
            CoreError::Validation(format!("value cannot be interpreted as {expected}"))
        };

        match (hint, value) {
            (_, Value::Null) => Err(CoreError::Validation("value must not be null".into())),

            (None, Value::String(s)) => Ok(SettingValue::String(s)),
            (None, Value::Number(n)) => Ok(SettingValue::Number(n)),
            (None, Value::Bool(b)) => Ok(SettingValue::Boolean(b)),
            (None, v @ (Value::Array(_) | Value::Object(_))) => Ok(SettingValue::Structured(v)),

            (Some(SettingType::String), Value::String(s)) => Ok(SettingValue::String(s)),
            (Some(SettingType::String), Value::Number(n)) => Ok(SettingValue::String(n.to_string())),
            (Some(SettingType::String), Value::Bool(b)) => Ok(SettingValue::String(b.to_string())),
            (Some(SettingType::String), _) => Err(invalid("a string")),

            (Some(SettingType::Number), Value::Number(n)) => Ok(SettingValue::Number(n)),
            (Some(SettingType::Number), Value::String(s)) => parse_number(s.trim())
                .map(SettingValue::Number)
                .ok_or_else(|| invalid("a number")),
            (Some(SettingType::Number), _) => Err(invalid("a number")),

            (Some(SettingType::Boolean), Value::Bool(b)) => Ok(SettingValue::Boolean(b)),
            (Some(SettingType::Boolean), Value::String(s)) => match s.trim() {
                "true" => Ok(SettingValue::Boolean(true)),
                "false" => Ok(SettingValue::Boolean(false)),
                _ => Err(invalid("a boolean")),
            },
            (Some(SettingType::Boolean), _) => Err(invalid("a boolean")),

            (Some(SettingType::Structured), v @ (Value::Array(_) | Value::Object(_))) => {
                Ok(SettingValue::Structured(v))
            }
            (Some(SettingType::Structured), Value::String(s)) => {
                match serde_json::from_str::<Value>(&s) {
                    Ok(v @ (Value::Array(_) | Value::Object(_))) => Ok(SettingValue::Structured(v)),
                    _ => Err(invalid("a JSON object or array")),
                }
            }
            (Some(SettingType::Structured), _) => Err(invalid("a JSON object or array")),
        }
    }

    /// Rebuild a stored value. The stored type must match the JSON exactly.
    pub fn from_stored(value: Value, value_type: &str) -> Result<Self, CoreError> {
        let hint = value_type
            .parse::<SettingType>()
            .map_err(CoreError::Internal)?;
        Self::from_json(value, Some(hint))
    }

    pub fn setting_type(&self) -> SettingType {
        match self {
            SettingValue::String(_) => SettingType::String,
            SettingValue::Number(_) => SettingType::Number,
            SettingValue::Boolean(_) => SettingType::Boolean,
            SettingValue::Structured(_) => SettingType::Structured,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            SettingValue::String(s) => Value::String(s.clone()),
            SettingValue::Number(n) => Value::Number(n.clone()),
            SettingValue::Boolean(b) => Value::Bool(*b),
            SettingValue::Structured(v) => v.clone(),
        }
    }

    /// The value as an integer, when it is an integral number.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SettingValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }
}

fn parse_number(s: &str) -> Option<serde_json::Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(i.into());
    }
    s.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
}

/// Resolve the team size cap from an optional stored setting.
pub fn max_team_members(setting: Option<&SettingValue>) -> i64 {
    setting
        .and_then(SettingValue::as_i64)
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_TEAM_MEMBERS)
}

/// Resolve the default tournament entry fee from an optional stored setting.
pub fn default_entry_fee(setting: Option<&SettingValue>) -> i32 {
    setting
        .and_then(SettingValue::as_i64)
        .and_then(|n| i32::try_from(n).ok())
        .filter(|n| *n >= 0)
        .unwrap_or(0)
}
