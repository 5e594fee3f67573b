//! The request-scoped acting user.
//!
//! Every policy check and history write receives an [`Actor`] explicitly;
//! nothing reads the current user from ambient state.

use crate::error::CoreError;
use crate::types::EntityId;

/// The authenticated user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Identity-provider subject, which is also the `users.id` value.
    pub user_id: EntityId,
    /// Admin flag from the verified credential.
    pub is_admin: bool,
}

impl Actor {
    pub fn new(user_id: impl Into<EntityId>, is_admin: bool) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin,
        }
    }

    /// Fail with `Forbidden` unless the actor is an admin.
    pub fn require_admin(&self) -> Result<(), CoreError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(CoreError::Forbidden("Admin role required".into()))
        }
    }

    /// Whether the actor is an admin or the given team manager.
    pub fn can_manage_team(&self, manager_id: &str) -> bool {
        self.is_admin || self.user_id == manager_id
    }

    /// Fail with `Forbidden` unless the actor is an admin or the given team manager.
    pub fn require_team_manager(&self, manager_id: &str) -> Result<(), CoreError> {
        if self.can_manage_team(manager_id) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "Only the team manager or an admin may do this".into(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn admin_passes_admin_check() {
        assert!(Actor::new("u1", true).require_admin().is_ok());
    }

    #[test]
    fn non_admin_is_forbidden() {
        let result = Actor::new("u1", false).require_admin();
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn manager_can_manage_own_team() {
        let actor = Actor::new("mgr", false);
        assert!(actor.can_manage_team("mgr"));
        assert!(!actor.can_manage_team("someone-else"));
    }

    #[test]
    fn admin_can_manage_any_team() {
        assert!(Actor::new("root", true).require_team_manager("mgr").is_ok());
    }
}
