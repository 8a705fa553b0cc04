use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tasklane_core::AppError;

/// Atomic board capability checked by the board access guard.
///
/// The same closed set is used for required-permission declarations on
/// operations and for the materialized permission set of a board member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardPermission {
    /// Allows renaming or describing the board.
    BoardUpdate,
    /// Allows deleting the board.
    BoardDelete,
    /// Allows adding members to the board.
    BoardMembersCreate,
    /// Allows updating member records.
    BoardMembersUpdate,
    /// Allows removing members from the board.
    BoardMembersDelete,
    /// Allows changing member roles.
    BoardMembersRoleUpdate,
    /// Allows changing member permissions.
    BoardMembersPermissionUpdate,
    /// Allows creating lists.
    ListCreate,
    /// Allows renaming lists.
    ListUpdate,
    /// Allows deleting lists.
    ListDelete,
    /// Allows reordering lists.
    ListsOrderUpdate,
    /// Allows creating tasks.
    TaskCreate,
    /// Allows editing task content.
    TaskUpdate,
    /// Allows deleting tasks.
    TaskDelete,
    /// Allows reordering tasks.
    TasksOrderUpdate,
    /// Allows attaching labels to tasks.
    TaskLabelCreate,
    /// Allows editing task labels.
    TaskLabelUpdate,
    /// Allows removing task labels.
    TaskLabelDelete,
    /// Allows assigning members to tasks.
    TaskAssign,
    /// Allows removing task assignees.
    TaskUnassign,
    /// Allows changing task due dates.
    TaskDueDateUpdate,
    /// Allows moving tasks between lists.
    TaskMove,
    /// Allows changing task status.
    TaskStatusUpdate,
    /// Allows commenting on tasks.
    TaskCommentCreate,
    /// Allows editing task comments.
    TaskCommentUpdate,
    /// Allows deleting task comments.
    TaskCommentDelete,
    /// Allows uploading task attachments.
    TaskAttachmentCreate,
    /// Allows deleting task attachments.
    TaskAttachmentDelete,
    /// Allows viewing task attachments.
    TaskAttachmentView,
}

impl BoardPermission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BoardUpdate => "BOARD_UPDATE",
            Self::BoardDelete => "BOARD_DELETE",
            Self::BoardMembersCreate => "BOARD_MEMBERS_CREATE",
            Self::BoardMembersUpdate => "BOARD_MEMBERS_UPDATE",
            Self::BoardMembersDelete => "BOARD_MEMBERS_DELETE",
            Self::BoardMembersRoleUpdate => "BOARD_MEMBERS_ROLE_UPDATE",
            Self::BoardMembersPermissionUpdate => "BOARD_MEMBERS_PERMISSION_UPDATE",
            Self::ListCreate => "LIST_CREATE",
            Self::ListUpdate => "LIST_UPDATE",
            Self::ListDelete => "LIST_DELETE",
            Self::ListsOrderUpdate => "LISTS_ORDER_UPDATE",
            Self::TaskCreate => "TASK_CREATE",
            Self::TaskUpdate => "TASK_UPDATE",
            Self::TaskDelete => "TASK_DELETE",
            Self::TasksOrderUpdate => "TASKS_ORDER_UPDATE",
            Self::TaskLabelCreate => "TASK_LABEL_CREATE",
            Self::TaskLabelUpdate => "TASK_LABEL_UPDATE",
            Self::TaskLabelDelete => "TASK_LABEL_DELETE",
            Self::TaskAssign => "TASK_ASSIGN",
            Self::TaskUnassign => "TASK_UNASSIGN",
            Self::TaskDueDateUpdate => "TASK_DUE_DATE_UPDATE",
            Self::TaskMove => "TASK_MOVE",
            Self::TaskStatusUpdate => "TASK_STATUS_UPDATE",
            Self::TaskCommentCreate => "TASK_COMMENT_CREATE",
            Self::TaskCommentUpdate => "TASK_COMMENT_UPDATE",
            Self::TaskCommentDelete => "TASK_COMMENT_DELETE",
            Self::TaskAttachmentCreate => "TASK_ATTACHMENT_CREATE",
            Self::TaskAttachmentDelete => "TASK_ATTACHMENT_DELETE",
            Self::TaskAttachmentView => "TASK_ATTACHMENT_VIEW",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[BoardPermission] = &[
            BoardPermission::BoardUpdate,
            BoardPermission::BoardDelete,
            BoardPermission::BoardMembersCreate,
            BoardPermission::BoardMembersUpdate,
            BoardPermission::BoardMembersDelete,
            BoardPermission::BoardMembersRoleUpdate,
            BoardPermission::BoardMembersPermissionUpdate,
            BoardPermission::ListCreate,
            BoardPermission::ListUpdate,
            BoardPermission::ListDelete,
            BoardPermission::ListsOrderUpdate,
            BoardPermission::TaskCreate,
            BoardPermission::TaskUpdate,
            BoardPermission::TaskDelete,
            BoardPermission::TasksOrderUpdate,
            BoardPermission::TaskLabelCreate,
            BoardPermission::TaskLabelUpdate,
            BoardPermission::TaskLabelDelete,
            BoardPermission::TaskAssign,
            BoardPermission::TaskUnassign,
            BoardPermission::TaskDueDateUpdate,
            BoardPermission::TaskMove,
            BoardPermission::TaskStatusUpdate,
            BoardPermission::TaskCommentCreate,
            BoardPermission::TaskCommentUpdate,
            BoardPermission::TaskCommentDelete,
            BoardPermission::TaskAttachmentCreate,
            BoardPermission::TaskAttachmentDelete,
            BoardPermission::TaskAttachmentView,
        ];

        ALL
    }

    /// Parses a transport value into a permission.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl Display for BoardPermission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for BoardPermission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown board permission '{value}'")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use super::BoardPermission;

    #[test]
    fn permission_roundtrip_storage_value() {
        for permission in BoardPermission::all() {
            let restored = BoardPermission::from_str(permission.as_str());
            assert_eq!(restored.ok(), Some(*permission));
        }
    }

    #[test]
    fn unknown_permission_is_rejected() {
        let parsed = BoardPermission::from_str("TASK_TELEPORT");
        assert!(parsed.is_err());
    }

    #[test]
    fn storage_values_are_unique() {
        let values: HashSet<&str> = BoardPermission::all()
            .iter()
            .map(BoardPermission::as_str)
            .collect();
        assert_eq!(values.len(), BoardPermission::all().len());
    }

    #[test]
    fn serde_uses_storage_value() {
        let encoded = serde_json::to_string(&BoardPermission::BoardMembersPermissionUpdate);
        assert_eq!(
            encoded.ok().as_deref(),
            Some("\"BOARD_MEMBERS_PERMISSION_UPDATE\"")
        );
    }
}
