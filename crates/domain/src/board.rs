use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasklane_core::{AppError, AppResult, BoardId, ListId, TaskId, UserId};

use crate::{BoardPermission, BoardRole, highest_rank, permissions_for_roles};

/// Top-level container owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Board identifier.
    pub id: BoardId,
    /// Board title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Exclusive owner, implicitly granted every permission.
    pub owner_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Returns whether `user_id` owns this board.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// Membership of one user on one board.
///
/// The permission set is a materialized cache derived from the roles. It is
/// recomputed whenever roles change and may afterwards be narrowed by an
/// explicit permission update, never widened beyond the role-derived set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardMember {
    board_id: BoardId,
    member_id: UserId,
    roles: BTreeSet<BoardRole>,
    permissions: BTreeSet<BoardPermission>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BoardMember {
    /// Creates a membership whose permissions are derived from `roles`.
    pub fn with_roles(
        board_id: BoardId,
        member_id: UserId,
        roles: impl IntoIterator<Item = BoardRole>,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        let roles = normalize_roles(roles)?;
        let permissions = permissions_for_roles(&roles);

        Ok(Self {
            board_id,
            member_id,
            roles,
            permissions,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a membership from persisted values.
    pub fn restore(
        board_id: BoardId,
        member_id: UserId,
        roles: impl IntoIterator<Item = BoardRole>,
        permissions: impl IntoIterator<Item = BoardPermission>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            board_id,
            member_id,
            roles: normalize_roles(roles)?,
            permissions: permissions.into_iter().collect(),
            created_at,
            updated_at,
        })
    }

    /// Returns the board identifier.
    #[must_use]
    pub fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the member user identifier.
    #[must_use]
    pub fn member_id(&self) -> UserId {
        self.member_id
    }

    /// Returns the member roles.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<BoardRole> {
        &self.roles
    }

    /// Returns the materialized permission set.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<BoardPermission> {
        &self.permissions
    }

    /// Returns the membership creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the highest rank among the member roles.
    #[must_use]
    pub fn highest_rank(&self) -> u8 {
        highest_rank(&self.roles).unwrap_or_default()
    }

    /// Returns whether the member holds `role`.
    #[must_use]
    pub fn has_role(&self, role: BoardRole) -> bool {
        self.roles.contains(&role)
    }

    /// Returns the widest permission set the member roles allow.
    #[must_use]
    pub fn role_permissions(&self) -> BTreeSet<BoardPermission> {
        permissions_for_roles(&self.roles)
    }

    /// Replaces roles and resets permissions to the role-derived set.
    pub fn assign_roles(
        &mut self,
        roles: impl IntoIterator<Item = BoardRole>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let roles = normalize_roles(roles)?;
        self.permissions = permissions_for_roles(&roles);
        self.roles = roles;
        self.updated_at = now;
        Ok(())
    }

    /// Replaces the materialized permission set.
    pub fn set_permissions(
        &mut self,
        permissions: impl IntoIterator<Item = BoardPermission>,
        now: DateTime<Utc>,
    ) {
        self.permissions = permissions.into_iter().collect();
        self.updated_at = now;
    }
}

fn normalize_roles(roles: impl IntoIterator<Item = BoardRole>) -> AppResult<BTreeSet<BoardRole>> {
    let roles: BTreeSet<BoardRole> = roles.into_iter().collect();
    if roles.is_empty() {
        return Err(AppError::Validation(
            "a board member must hold at least one role".to_owned(),
        ));
    }

    Ok(roles)
}

/// Ordered column of tasks inside a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardList {
    /// List identifier.
    pub id: ListId,
    /// Owning board.
    pub board_id: BoardId,
    /// List title.
    pub title: String,
    /// Zero-based position among the board lists.
    pub position: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(AppError::Validation(format!("unknown task status '{value}'"))),
        }
    }
}

/// Unit of work tracked in a board list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,
    /// Owning board.
    pub board_id: BoardId,
    /// Containing list.
    pub list_id: ListId,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow state.
    pub status: TaskStatus,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
