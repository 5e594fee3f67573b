//! Team permission roles and the rules for changing them.

use crate::error::CoreError;

define_str_enum! {
    /// A user's role on a team.
    TeamRole ("team role") {
        Manager => "manager",
        Member => "member",
    }
}

define_str_enum! {
    /// The kind of permission change recorded in history.
    PermissionAction ("permission action") {
        Add => "add",
        Remove => "remove",
        Update => "update",
    }
}

/// Check a permission change against the user's current role on the team.
///
/// - `add` requires no current role.
/// - `update` requires a current role different from `requested`.
/// - `remove` requires a current role.
///
/// The team's registered manager keeps the `manager` role: it can be neither
/// removed nor downgraded until the team is reassigned.
pub fn check_permission_action(
    action: PermissionAction,
    current: Option<TeamRole>,
    requested: Option<TeamRole>,
    target_is_team_manager: bool,
) -> Result<(), CoreError> {
    match action {
        PermissionAction::Add => {
            if let Some(role) = current {
                return Err(CoreError::Conflict(format!(
                    "User already has role '{role}' on this team"
                )));
            }
            if requested.is_none() {
                return Err(CoreError::Validation("role is required".into()));
            }
        }
        PermissionAction::Update => {
            let Some(existing) = current else {
                return Err(CoreError::Conflict(
                    "User has no permission on this team".into(),
                ));
            };
            let Some(role) = requested else {
                return Err(CoreError::Validation("role is required".into()));
            };
            if existing == role {
                return Err(CoreError::Conflict(format!(
                    "User already has role '{role}' on this team"
                )));
            }
            if target_is_team_manager && existing == TeamRole::Manager {
                return Err(CoreError::Conflict(
                    "The team manager's role cannot be downgraded; reassign the team first"
                        .into(),
                ));
            }
        }
        PermissionAction::Remove => {
            if current.is_none() {
                return Err(CoreError::Conflict(
                    "User has no permission on this team".into(),
                ));
            }
            if target_is_team_manager {
                return Err(CoreError::Conflict(
                    "The team manager's permission cannot be removed; reassign the team first"
                        .into(),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn add_requires_no_existing_role() {
        assert!(check_permission_action(
            PermissionAction::Add,
            None,
            Some(TeamRole::Member),
            false
        )
        .is_ok());

        let result = check_permission_action(
            PermissionAction::Add,
            Some(TeamRole::Member),
            Some(TeamRole::Member),
            false,
        );
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[test]
    fn update_to_same_role_conflicts() {
        let result = check_permission_action(
            PermissionAction::Update,
            Some(TeamRole::Member),
            Some(TeamRole::Member),
            false,
        );
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[test]
    fn update_promotes_member() {
        assert!(check_permission_action(
            PermissionAction::Update,
            Some(TeamRole::Member),
            Some(TeamRole::Manager),
            false
        )
        .is_ok());
    }

    #[test]
    fn remove_without_role_conflicts() {
        let result = check_permission_action(PermissionAction::Remove, None, None, false);
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[test]
    fn team_manager_cannot_be_removed_or_downgraded() {
        let removed = check_permission_action(
            PermissionAction::Remove,
            Some(TeamRole::Manager),
            None,
            true,
        );
        assert_matches!(removed, Err(CoreError::Conflict(msg)) if msg.contains("reassign"));

        let downgraded = check_permission_action(
            PermissionAction::Update,
            Some(TeamRole::Manager),
            Some(TeamRole::Member),
            true,
        );
        assert_matches!(downgraded, Err(CoreError::Conflict(_)));
    }

    #[test]
    fn role_parsing() {
        assert_eq!("manager".parse::<TeamRole>(), Ok(TeamRole::Manager));
        assert!("owner".parse::<TeamRole>().is_err());
    }
}
