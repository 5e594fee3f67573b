//! Tournament entry restrictions and the eligibility check run before a
//! player is entered.

use serde::{Deserialize, Serialize};

use crate::class::PlayerClass;
use crate::error::CoreError;
use crate::status::{PlayerStatus, TournamentStatus};
use crate::types::Timestamp;

fn default_min_players_per_team() -> i32 {
    1
}

/// Participation bounds for one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRestriction {
    pub class_name: String,
    #[serde(default)]
    pub min_participation: i32,
    pub max_participation: Option<i32>,
}

/// Capacity and class limits for a tournament.
///
/// An empty `class_restrictions` list means every class may enter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRestriction {
    pub max_players: i32,
    #[serde(default = "default_min_players_per_team")]
    pub min_players_per_team: i32,
    pub max_players_per_team: i32,
    #[serde(default)]
    pub class_restrictions: Vec<ClassRestriction>,
}

impl Default for EntryRestriction {
    fn default() -> Self {
        Self {
            max_players: 100,
            min_players_per_team: 1,
            max_players_per_team: 8,
            class_restrictions: Vec::new(),
        }
    }
}

impl EntryRestriction {
    /// The participation rule for `class`, if classes are restricted.
    ///
    /// Returns `Ok(None)` when the tournament is open to every class and an
    /// error when classes are restricted but `class` is not listed.
    pub fn rule_for(&self, class: PlayerClass) -> Result<Option<&ClassRestriction>, CoreError> {
        if self.class_restrictions.is_empty() {
            return Ok(None);
        }
        self.class_restrictions
            .iter()
            .find(|r| r.class_name == class.as_str())
            .map(Some)
            .ok_or_else(|| {
                CoreError::Validation(format!("Class {class} is not eligible for this tournament"))
            })
    }
}

impl EntryRestriction {
    /// Whether a team fielding `active_entries` players meets the per-team
    /// minimum. A team with no entries is not taking part and always passes.
    pub fn team_meets_minimum(&self, active_entries: i64) -> bool {
        active_entries == 0 || active_entries >= i64::from(self.min_players_per_team)
    }
}

/// Everything the eligibility check needs to know, gathered by the caller
/// inside the entry transaction.
#[derive(Debug, Clone)]
pub struct EntryCandidate<'a> {
    pub tournament_status: &'a str,
    pub entry_start_date: Timestamp,
    pub entry_end_date: Timestamp,
    pub restriction: &'a EntryRestriction,
    /// Entries that are neither rejected nor cancelled.
    pub active_entries: i64,
    /// Active entries already held by the entering team.
    pub team_active_entries: i64,
    pub entering_team_id: &'a str,
    pub player_team_id: Option<&'a str>,
    pub player_status: &'a str,
    pub player_class: &'a str,
    pub participation_count: i32,
    pub now: Timestamp,
}

/// Decide whether a player may be entered into a tournament.
///
/// Order of checks: tournament status, entry window, player membership and
/// status, class eligibility, then capacity.
pub fn check_entry_eligibility(candidate: &EntryCandidate<'_>) -> Result<(), CoreError> {
    if candidate.tournament_status != TournamentStatus::EntryOpen.as_str() {
        return Err(CoreError::Validation(format!(
            "Tournament is not accepting entries (status '{}')",
            candidate.tournament_status
        )));
    }
    if candidate.now < candidate.entry_start_date {
        return Err(CoreError::Validation("Entry period has not started".into()));
    }
    if candidate.now > candidate.entry_end_date {
        return Err(CoreError::Validation("Entry period has ended".into()));
    }

    if candidate.player_team_id != Some(candidate.entering_team_id) {
        return Err(CoreError::Validation(
            "Player is not a member of the entering team".into(),
        ));
    }
    if candidate.player_status != PlayerStatus::Active.as_str() {
        return Err(CoreError::Validation("Player is not active".into()));
    }

    let class = candidate
        .player_class
        .parse::<PlayerClass>()
        .map_err(CoreError::Internal)?;
    if let Some(rule) = candidate.restriction.rule_for(class)? {
        if candidate.participation_count < rule.min_participation {
            return Err(CoreError::Validation(format!(
                "Class {class} requires at least {} prior participations",
                rule.min_participation
            )));
        }
        if let Some(max) = rule.max_participation {
            if candidate.participation_count > max {
                return Err(CoreError::Validation(format!(
                    "Class {class} allows at most {max} prior participations"
                )));
            }
        }
    }

    if candidate.active_entries >= i64::from(candidate.restriction.max_players) {
        return Err(CoreError::Conflict(
            "Tournament has reached its maximum number of players".into(),
        ));
    }
    if candidate.team_active_entries >= i64::from(candidate.restriction.max_players_per_team) {
        return Err(CoreError::Conflict(
            "Team has reached its maximum number of players for this tournament".into(),
        ));
    }

    Ok(())
}
