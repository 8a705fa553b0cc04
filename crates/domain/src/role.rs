use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tasklane_core::AppError;

use crate::BoardPermission;

/// Coarse authority tier of a board member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardRole {
    /// Full authority over the board.
    Owner,
    /// Manages members, lists and tasks.
    Manager,
    /// Works on tasks.
    Member,
    /// Read-only access.
    Viewer,
}

const MANAGER_PERMISSIONS: &[BoardPermission] = &[
    BoardPermission::BoardMembersPermissionUpdate,
    BoardPermission::BoardMembersCreate,
    BoardPermission::BoardMembersUpdate,
    BoardPermission::BoardMembersDelete,
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
];

const MEMBER_PERMISSIONS: &[BoardPermission] = &[
    BoardPermission::TaskMove,
    BoardPermission::TaskStatusUpdate,
    BoardPermission::TaskCommentCreate,
    BoardPermission::TaskCommentUpdate,
    BoardPermission::TaskCommentDelete,
    BoardPermission::TaskAttachmentCreate,
    BoardPermission::TaskAttachmentDelete,
    BoardPermission::TaskAttachmentView,
];

const VIEWER_PERMISSIONS: &[BoardPermission] = &[];

impl BoardRole {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Manager => "MANAGER",
            Self::Member => "MEMBER",
            Self::Viewer => "VIEWER",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Owner, Self::Manager, Self::Member, Self::Viewer]
    }

    /// Returns the static permission set granted by this role.
    #[must_use]
    pub fn permissions(&self) -> &'static [BoardPermission] {
        match self {
            Self::Owner => BoardPermission::all(),
            Self::Manager => MANAGER_PERMISSIONS,
            Self::Member => MEMBER_PERMISSIONS,
            Self::Viewer => VIEWER_PERMISSIONS,
        }
    }

    /// Returns the position of this role in the board hierarchy.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Owner => 3,
            Self::Manager => 2,
            Self::Member => 1,
            Self::Viewer => 0,
        }
    }

    /// Parses a transport value into a role.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl Display for BoardRole {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for BoardRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "OWNER" => Ok(Self::Owner),
            "MANAGER" => Ok(Self::Manager),
            "MEMBER" => Ok(Self::Member),
            "VIEWER" => Ok(Self::Viewer),
            _ => Err(AppError::Validation(format!("unknown board role '{value}'"))),
        }
    }
}

/// Returns the static permission entry for one role.
#[must_use]
pub fn permissions_for_role(role: BoardRole) -> &'static [BoardPermission] {
    role.permissions()
}

/// Returns the deduplicated union of the permissions granted by `roles`.
pub fn permissions_for_roles<'a>(
    roles: impl IntoIterator<Item = &'a BoardRole>,
) -> BTreeSet<BoardPermission> {
    roles
        .into_iter()
        .flat_map(|role| role.permissions().iter().copied())
        .collect()
}

/// Returns the highest rank among `roles`, or `None` when there are no roles.
pub fn highest_rank<'a>(roles: impl IntoIterator<Item = &'a BoardRole>) -> Option<u8> {
    roles.into_iter().map(BoardRole::rank).max()
}
