//! Field-level validation rules for every writable entity.
//!
//! Each `validate_*` function is pure: it inspects a draft and returns either
//! `Ok(())` or a [`FieldErrors`] map of field name to message. The first
//! violation found for a field wins. Callers never persist a draft that
//! failed validation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use validator::ValidateEmail;

use crate::class::PlayerClass;
use crate::entry::EntryRestriction;
use crate::types::Timestamp;

/// Maximum length of a team name, in characters.
pub const MAX_TEAM_NAME_LEN: usize = 50;
/// Maximum length of a team description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;
/// Maximum length of a player or user display name, in characters.
pub const MAX_NAME_LEN: usize = 50;
/// Maximum length of a class-change or permission-change reason.
pub const MAX_REASON_LEN: usize = 200;
/// Maximum length of a setting key.
pub const MAX_SETTING_KEY_LEN: usize = 64;

/// Federation identifiers look like `JDL000123`.
pub const EXTERNAL_ID_PATTERN: &str = r"^JDL\d{6}$";

static EXTERNAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EXTERNAL_ID_PATTERN).expect("valid regex"));

// Letters (any script, including the prolonged sound mark), digits,
// whitespace, hyphen, underscore and the katakana middle dot.
static TEAM_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}\s\-_・]+$").expect("valid regex"));

static SETTING_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_.]*$").expect("valid regex"));

// ---------------------------------------------------------------------------
// FieldErrors
// ---------------------------------------------------------------------------

/// Ordered map of field name to validation message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field` unless one is already recorded.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another error map in, keeping existing messages on collisions.
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.0.entry(field).or_insert(message);
        }
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        f.write_str(&parts.join("; "))
    }
}

// ---------------------------------------------------------------------------
// Shared checks
// ---------------------------------------------------------------------------

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn require_text(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    if is_blank(value) {
        errors.add(field, format!("{field} is required"));
    }
}

fn require_date(errors: &mut FieldErrors, field: &str, value: Option<Timestamp>) {
    if value.is_none() {
        errors.add(field, format!("{field} is required"));
    }
}

fn check_max_chars(errors: &mut FieldErrors, field: &str, value: Option<&str>, max: usize) {
    if let Some(v) = value {
        if v.chars().count() > max {
            errors.add(field, format!("{field} must be at most {max} characters"));
        }
    }
}

/// Whether `value` is a well-formed federation identifier.
pub fn is_valid_external_id(value: &str) -> bool {
    EXTERNAL_ID_RE.is_match(value)
}

fn check_class(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<PlayerClass> {
    let value = value?;
    match value.parse::<PlayerClass>() {
        Ok(class) => Some(class),
        Err(msg) => {
            errors.add(field, msg);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tournament
// ---------------------------------------------------------------------------

/// Candidate tournament values, as they would be after a create or update.
#[derive(Debug, Clone, Default)]
pub struct TournamentDraft<'a> {
    pub name: Option<&'a str>,
    pub venue: Option<&'a str>,
    pub entry_fee: Option<i32>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub entry_start_date: Option<Timestamp>,
    pub entry_end_date: Option<Timestamp>,
    pub entry_restriction: Option<&'a EntryRestriction>,
}

/// Validate a tournament.
///
/// Requires `start_date < end_date`, `entry_start_date < entry_end_date` and
/// `entry_end_date < start_date`. Never adjusts dates.
pub fn validate_tournament(draft: &TournamentDraft<'_>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    require_text(&mut errors, "name", draft.name);
    require_text(&mut errors, "venue", draft.venue);
    require_date(&mut errors, "start_date", draft.start_date);
    require_date(&mut errors, "end_date", draft.end_date);
    require_date(&mut errors, "entry_start_date", draft.entry_start_date);
    require_date(&mut errors, "entry_end_date", draft.entry_end_date);

    if draft.entry_fee.is_some_and(|fee| fee < 0) {
        errors.add("entry_fee", "entry fee must not be negative");
    }

    if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
        if start >= end {
            errors.add("end_date", "end date must be after start date");
        }
    }

    if let (Some(entry_start), Some(entry_end)) = (draft.entry_start_date, draft.entry_end_date) {
        if entry_start >= entry_end {
            errors.add(
                "entry_end_date",
                "entry end date must be after entry start date",
            );
        }
    }

    if let (Some(entry_end), Some(start)) = (draft.entry_end_date, draft.start_date) {
        if entry_end >= start {
            errors.add("entry_end_date", "entry end date must be before start date");
        }
    }

    if let Some(restriction) = draft.entry_restriction {
        if let Err(restriction_errors) = validate_entry_restriction(restriction) {
            errors.extend(restriction_errors);
        }
    }

    errors.into_result()
}

/// Validate an entry restriction. Field names are prefixed with
/// `entry_restriction.`.
pub fn validate_entry_restriction(restriction: &EntryRestriction) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if restriction.max_players <= 0 {
        errors.add(
            "entry_restriction.max_players",
            "max players must be greater than 0",
        );
    }
    if restriction.min_players_per_team < 1 {
        errors.add(
            "entry_restriction.min_players_per_team",
            "min players per team must be at least 1",
        );
    }
    if restriction.max_players_per_team < restriction.min_players_per_team {
        errors.add(
            "entry_restriction.max_players_per_team",
            "max players per team must not be less than min players per team",
        );
    }

    let mut seen: Vec<PlayerClass> = Vec::new();
    for (idx, rule) in restriction.class_restrictions.iter().enumerate() {
        let prefix = format!("entry_restriction.class_restrictions[{idx}]");
        let class_field = format!("{prefix}.class_name");
        if let Some(class) = check_class(&mut errors, &class_field, Some(rule.class_name.as_str())) {
            if seen.contains(&class) {
                errors.add(&class_field, format!("class {class} is listed more than once"));
            }
            seen.push(class);
        }
        if rule.min_participation < 0 {
            errors.add(
                &format!("{prefix}.min_participation"),
                "min participation must not be negative",
            );
        }
        if rule
            .max_participation
            .is_some_and(|max| max < rule.min_participation)
        {
            errors.add(
                &format!("{prefix}.max_participation"),
                "max participation must not be less than min participation",
            );
        }
    }

    errors.into_result()
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TeamDraft<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Validate a team. Names accept any script (including Japanese).
pub fn validate_team(draft: &TeamDraft<'_>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    require_text(&mut errors, "name", draft.name);
    check_max_chars(&mut errors, "name", draft.name, MAX_TEAM_NAME_LEN);
    if let Some(name) = draft.name.filter(|n| !n.trim().is_empty()) {
        if !TEAM_NAME_RE.is_match(name) {
            errors.add(
                "name",
                "name may only contain letters, digits, spaces, '-', '_' and '・'",
            );
        }
    }
    check_max_chars(
        &mut errors,
        "description",
        draft.description,
        MAX_DESCRIPTION_LEN,
    );

    errors.into_result()
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PlayerDraft<'a> {
    pub name: Option<&'a str>,
    pub external_id: Option<&'a str>,
    pub current_class: Option<&'a str>,
    pub participation_count: Option<i32>,
}

pub fn validate_player(draft: &PlayerDraft<'_>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    require_text(&mut errors, "name", draft.name);
    check_max_chars(&mut errors, "name", draft.name, MAX_NAME_LEN);
    require_text(&mut errors, "external_id", draft.external_id);
    if let Some(id) = draft.external_id.filter(|v| !v.trim().is_empty()) {
        if !is_valid_external_id(id) {
            errors.add(
                "external_id",
                "external_id must be 'JDL' followed by six digits",
            );
        }
    }
    check_class(&mut errors, "current_class", draft.current_class);
    if draft.participation_count.is_some_and(|c| c < 0) {
        errors.add(
            "participation_count",
            "participation count must not be negative",
        );
    }

    errors.into_result()
}

// ---------------------------------------------------------------------------
// Class change
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ClassChangeDraft<'a> {
    pub old_class: Option<&'a str>,
    pub new_class: Option<&'a str>,
    pub reason: Option<&'a str>,
}

/// Validate a class change. The new class must differ from the old one.
pub fn validate_class_change(draft: &ClassChangeDraft<'_>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if draft.old_class.is_none() {
        errors.add("old_class", "old_class is required");
    }
    if draft.new_class.is_none() {
        errors.add("new_class", "new_class is required");
    }
    let old = check_class(&mut errors, "old_class", draft.old_class);
    let new = check_class(&mut errors, "new_class", draft.new_class);
    if let (Some(old), Some(new)) = (old, new) {
        if old == new {
            errors.add("new_class", "new class must differ from the current class");
        }
    }
    require_text(&mut errors, "reason", draft.reason);
    check_max_chars(&mut errors, "reason", draft.reason, MAX_REASON_LEN);

    errors.into_result()
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct UserDraft<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
}

pub fn validate_user(draft: &UserDraft<'_>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Some(name) = draft.name {
        if name.trim().is_empty() {
            errors.add("name", "name must not be blank");
        }
    }
    check_max_chars(&mut errors, "name", draft.name, MAX_NAME_LEN);
    if let Some(email) = draft.email {
        if !email.validate_email() {
            errors.add("email", "email is not a valid address");
        }
    }

    errors.into_result()
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

pub fn validate_setting_key(key: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if key.is_empty() {
        errors.add("key", "key is required");
    } else if key.len() > MAX_SETTING_KEY_LEN {
        errors.add(
            "key",
            format!("key must be at most {MAX_SETTING_KEY_LEN} characters"),
        );
    } else if !SETTING_KEY_RE.is_match(key) {
        errors.add(
            "key",
            "key must start with a lowercase letter and contain only a-z, 0-9, '_' and '.'",
        );
    }
    errors.into_result()
}
