//! Status lifecycles and the transition policy.
//!
//! Each lifecycle lists the statuses reachable from a given status and the
//! authority required to move there. Transitions are only ever triggered by an
//! explicit request; nothing here is time-driven.

use std::str::FromStr;

use crate::actor::Actor;
use crate::error::CoreError;

define_str_enum! {
    /// Tournament lifecycle.
    TournamentStatus ("tournament status") {
        Draft => "draft",
        EntryOpen => "entry_open",
        EntryClosed => "entry_closed",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

define_str_enum! {
    /// Review status of a class-change request.
    ClassChangeStatus ("class change status") {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

define_str_enum! {
    /// Tournament entry status.
    EntryStatus ("entry status") {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}

define_str_enum! {
    /// Team archival status.
    TeamStatus ("team status") {
        Active => "active",
        Archived => "archived",
    }
}

define_str_enum! {
    /// Player activity status.
    PlayerStatus ("player status") {
        Active => "active",
        Inactive => "inactive",
    }
}

/// Who may perform a given transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    /// Admins only.
    Admin,
    /// Admins, or the manager of the team the record belongs to.
    AdminOrTeamManager,
}

/// A status set with a fixed transition table.
pub trait StatusLifecycle: Copy + Eq + FromStr<Err = String> + std::fmt::Display + 'static {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// Statuses reachable from `self` in a single step.
    fn allowed_next(self) -> &'static [Self];

    /// Authority required to move from `self` to `next`.
    fn authority(self, next: Self) -> Authority;

    fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl StatusLifecycle for TournamentStatus {
    const ENTITY: &'static str = "tournament";

    fn allowed_next(self) -> &'static [Self] {
        use TournamentStatus::*;
        match self {
            Draft => &[EntryOpen, EntryClosed, InProgress, Completed, Cancelled],
            EntryOpen => &[EntryClosed, InProgress, Completed, Cancelled],
            // Entries may be reopened after closing.
            EntryClosed => &[EntryOpen, InProgress, Completed, Cancelled],
            InProgress => &[Completed, Cancelled],
            Completed | Cancelled => &[],
        }
    }

    fn authority(self, _next: Self) -> Authority {
        Authority::Admin
    }
}

impl StatusLifecycle for ClassChangeStatus {
    const ENTITY: &'static str = "class change";

    fn allowed_next(self) -> &'static [Self] {
        use ClassChangeStatus::*;
        match self {
            Pending => &[Approved, Rejected],
            Approved | Rejected => &[],
        }
    }

    fn authority(self, _next: Self) -> Authority {
        Authority::Admin
    }
}

impl StatusLifecycle for EntryStatus {
    const ENTITY: &'static str = "entry";

    fn allowed_next(self) -> &'static [Self] {
        use EntryStatus::*;
        match self {
            Pending => &[Approved, Rejected, Cancelled],
            Approved => &[Cancelled],
            Rejected | Cancelled => &[],
        }
    }

    fn authority(self, next: Self) -> Authority {
        match next {
            EntryStatus::Cancelled => Authority::AdminOrTeamManager,
            _ => Authority::Admin,
        }
    }
}

impl StatusLifecycle for TeamStatus {
    const ENTITY: &'static str = "team";

    fn allowed_next(self) -> &'static [Self] {
        match self {
            TeamStatus::Active => &[TeamStatus::Archived],
            TeamStatus::Archived => &[TeamStatus::Active],
        }
    }

    fn authority(self, _next: Self) -> Authority {
        Authority::AdminOrTeamManager
    }
}

impl StatusLifecycle for PlayerStatus {
    const ENTITY: &'static str = "player";

    fn allowed_next(self) -> &'static [Self] {
        match self {
            PlayerStatus::Active => &[PlayerStatus::Inactive],
            PlayerStatus::Inactive => &[PlayerStatus::Active],
        }
    }

    fn authority(self, _next: Self) -> Authority {
        Authority::AdminOrTeamManager
    }
}

/// Parse a status string, mapping unknown values to a validation error.
pub fn parse_status<S: StatusLifecycle>(value: &str) -> Result<S, CoreError> {
    value.parse::<S>().map_err(CoreError::Validation)
}

/// Check that `from -> to` is a legal transition, without checking authority.
///
/// A transition to the same status is not a transition and is rejected.
pub fn check_transition<S: StatusLifecycle>(from: &str, to: &str) -> Result<(S, S), CoreError> {
    let current = parse_status::<S>(from)?;
    let next = parse_status::<S>(to)?;
    if !current.can_transition_to(next) {
        return Err(CoreError::InvalidTransition {
            entity: S::ENTITY,
            from: current.to_string(),
            to: next.to_string(),
        });
    }
    Ok((current, next))
}

/// Check legality and then authority for `from -> to`.
///
/// `team_manager_id` is the manager of the team the record belongs to, when
/// there is one. Without it, team-manager authority falls back to admin-only.
pub fn authorize_transition<S: StatusLifecycle>(
    actor: &Actor,
    from: &str,
    to: &str,
    team_manager_id: Option<&str>,
) -> Result<(S, S), CoreError> {
    let (current, next) = check_transition::<S>(from, to)?;
    let permitted = match current.authority(next) {
        Authority::Admin => actor.is_admin,
        Authority::AdminOrTeamManager => {
            actor.is_admin || team_manager_id.is_some_and(|m| m == actor.user_id)
        }
    };
    if !permitted {
        return Err(CoreError::Forbidden(format!(
            "Not permitted to move {} from '{current}' to '{next}'",
            S::ENTITY
        )));
    }
    Ok((current, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn admin() -> Actor {
        Actor::new("admin-1", true)
    }

    fn user(id: &str) -> Actor {
        Actor::new(id, false)
    }

    // -- tournament ---------------------------------------------------------

    #[test]
    fn tournament_moves_forward_and_may_skip() {
        assert!(check_transition::<TournamentStatus>("draft", "entry_open").is_ok());
        assert!(check_transition::<TournamentStatus>("draft", "in_progress").is_ok());
        assert!(check_transition::<TournamentStatus>("in_progress", "completed").is_ok());
    }

    #[test]
    fn tournament_entries_can_be_reopened() {
        assert!(check_transition::<TournamentStatus>("entry_closed", "entry_open").is_ok());
    }

    #[test]
    fn tournament_cannot_move_backwards() {
        let result = check_transition::<TournamentStatus>("in_progress", "entry_open");
        assert_matches!(result, Err(CoreError::InvalidTransition { entity: "tournament", .. }));
    }

    #[test]
    fn tournament_terminal_states_are_final() {
        for status in TournamentStatus::ALL {
            assert!(!TournamentStatus::Completed.can_transition_to(*status));
            assert!(!TournamentStatus::Cancelled.can_transition_to(*status));
        }
        assert!(TournamentStatus::Completed.is_terminal());
    }

    #[test]
    fn any_open_tournament_can_be_cancelled() {
        for from in ["draft", "entry_open", "entry_closed", "in_progress"] {
            assert!(check_transition::<TournamentStatus>(from, "cancelled").is_ok());
        }
    }

    #[test]
    fn tournament_transition_requires_admin() {
        let result =
            authorize_transition::<TournamentStatus>(&user("u1"), "draft", "entry_open", None);
        assert_matches!(result, Err(CoreError::Forbidden(_)));
        assert!(authorize_transition::<TournamentStatus>(&admin(), "draft", "entry_open", None).is_ok());
    }

    #[test]
    fn same_status_is_not_a_transition() {
        let result = check_transition::<TournamentStatus>("draft", "draft");
        assert_matches!(result, Err(CoreError::InvalidTransition { .. }));
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let result = check_transition::<TournamentStatus>("draft", "published");
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("published"));
    }

    // -- class change -------------------------------------------------------

    #[test]
    fn pending_class_change_can_be_decided() {
        assert!(check_transition::<ClassChangeStatus>("pending", "approved").is_ok());
        assert!(check_transition::<ClassChangeStatus>("pending", "rejected").is_ok());
    }

    #[test]
    fn approved_class_change_cannot_return_to_pending() {
        let result = check_transition::<ClassChangeStatus>("approved", "pending");
        assert_matches!(
            result,
            Err(CoreError::InvalidTransition { from, to, .. }) if from == "approved" && to == "pending"
        );
    }

    #[test]
    fn class_change_decision_requires_admin() {
        let result =
            authorize_transition::<ClassChangeStatus>(&user("mgr"), "pending", "approved", Some("mgr"));
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }

    // -- entry --------------------------------------------------------------

    #[test]
    fn team_manager_may_cancel_entry() {
        let result =
            authorize_transition::<EntryStatus>(&user("mgr"), "approved", "cancelled", Some("mgr"));
        assert!(result.is_ok());
    }

    #[test]
    fn team_manager_may_not_approve_entry() {
        let result =
            authorize_transition::<EntryStatus>(&user("mgr"), "pending", "approved", Some("mgr"));
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn other_user_may_not_cancel_entry() {
        let result =
            authorize_transition::<EntryStatus>(&user("x"), "pending", "cancelled", Some("mgr"));
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn cancelled_entry_is_terminal() {
        assert!(EntryStatus::Cancelled.is_terminal());
        assert!(EntryStatus::Rejected.is_terminal());
    }

    // -- team / player ------------------------------------------------------

    #[test]
    fn team_archive_round_trip() {
        assert!(check_transition::<TeamStatus>("active", "archived").is_ok());
        assert!(check_transition::<TeamStatus>("archived", "active").is_ok());
    }

    #[test]
    fn player_status_without_team_is_admin_only() {
        let result =
            authorize_transition::<PlayerStatus>(&user("u1"), "active", "inactive", None);
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }
}
