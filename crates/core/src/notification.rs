//! In-app notification kinds and their wording.

use crate::status::ClassChangeStatus;

define_str_enum! {
    /// What a notification is about.
    NotificationKind ("notification kind") {
        /// Sent to every admin when a class change is requested.
        ClassChangeRequested => "class_change_requested",
        /// Sent to the requester once their request is approved or rejected.
        ClassChangeDecided => "class_change_decided",
    }
}

/// Title and body of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationText {
    pub title: String,
    pub message: String,
}

pub fn class_change_requested(
    player_name: &str,
    old_class: &str,
    new_class: &str,
) -> NotificationText {
    NotificationText {
        title: "Class change requested".to_string(),
        message: format!("{player_name}: class {old_class} to {new_class} is awaiting review"),
    }
}

pub fn class_change_decided(
    player_name: &str,
    new_class: &str,
    decision: ClassChangeStatus,
) -> NotificationText {
    let verb = match decision {
        ClassChangeStatus::Approved => "approved",
        _ => "rejected",
    };
    NotificationText {
        title: format!("Class change {verb}"),
        message: format!("The request to move {player_name} to class {new_class} was {verb}"),
    }
}
