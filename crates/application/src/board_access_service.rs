use std::collections::BTreeSet;
use std::sync::Arc;

use tasklane_core::{AppError, AppResult, BoardId, UserId, UserIdentity};
use tasklane_domain::{Board, BoardMember, BoardPermission, BoardRole};

use crate::BoardMemberRepository;

/// Rank the board owner carries in hierarchy comparisons.
pub const OWNER_RANK: u8 = 3;

/// Effective standing of one user on one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardAccess {
    /// Board the standing was resolved for.
    pub board: Board,
    /// User the standing belongs to.
    pub user_id: UserId,
    /// Whether the user owns the board.
    pub is_owner: bool,
    /// Explicit membership row, absent for owners without one.
    pub membership: Option<BoardMember>,
    /// Effective permission set. Owners always receive the full universe.
    pub permissions: BTreeSet<BoardPermission>,
}

impl BoardAccess {
    /// Returns the board identifier.
    #[must_use]
    pub fn board_id(&self) -> BoardId {
        self.board.id
    }

    /// Returns whether the standing grants `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: BoardPermission) -> bool {
        self.is_owner || self.permissions.contains(&permission)
    }

    /// Returns effective roles. Owners always report `OWNER`.
    #[must_use]
    pub fn roles(&self) -> BTreeSet<BoardRole> {
        let mut roles = self
            .membership
            .as_ref()
            .map(|member| member.roles().clone())
            .unwrap_or_default();
        if self.is_owner {
            roles.insert(BoardRole::Owner);
        }
        roles
    }

    /// Returns the rank used when comparing against a mutation target.
    #[must_use]
    pub fn rank(&self) -> u8 {
        if self.is_owner {
            return OWNER_RANK;
        }

        self.membership
            .as_ref()
            .map(BoardMember::highest_rank)
            .unwrap_or_default()
    }
}

/// Application service that resolves board standing and enforces permission checks.
#[derive(Clone)]
pub struct BoardAccessService {
    repository: Arc<dyn BoardMemberRepository>,
}

impl BoardAccessService {
    /// Creates a new board access service.
    #[must_use]
    pub fn new(repository: Arc<dyn BoardMemberRepository>) -> Self {
        Self { repository }
    }

    /// Resolves the standing of `user_id` on `board_id`.
    ///
    /// Returns `Ok(None)` when the user is neither owner nor member and
    /// `NotFound` when the board does not exist.
    pub async fn resolve(
        &self,
        board_id: BoardId,
        user_id: UserId,
    ) -> AppResult<Option<BoardAccess>> {
        let standing = self
            .repository
            .find_standing(board_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("board '{board_id}' does not exist")))?;

        if standing.board.is_owned_by(user_id) {
            return Ok(Some(BoardAccess {
                board: standing.board,
                user_id,
                is_owner: true,
                membership: standing.membership,
                permissions: BoardPermission::all().iter().copied().collect(),
            }));
        }

        Ok(standing.membership.map(|member| BoardAccess {
            board: standing.board,
            user_id,
            is_owner: false,
            permissions: member.permissions().clone(),
            membership: Some(member),
        }))
    }

    /// Ensures the actor holds every permission in `required` on the board.
    ///
    /// An empty `required` slice only asserts standing on the board.
    pub async fn require_board_permissions(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        required: &[BoardPermission],
    ) -> AppResult<BoardAccess> {
        let access = self
            .resolve(board_id, actor.user_id())
            .await?
            .ok_or_else(|| {
                AppError::Forbidden(format!(
                    "user '{}' has no access to board '{board_id}'",
                    actor.user_id()
                ))
            })?;

        let missing: Vec<&'static str> = required
            .iter()
            .filter(|permission| !access.has_permission(**permission))
            .map(BoardPermission::as_str)
            .collect();

        if !missing.is_empty() {
            tracing::debug!(
                board_id = %board_id,
                user_id = %actor.user_id(),
                missing = ?missing,
                "board permission check denied"
            );
            return Err(AppError::Forbidden(format!(
                "missing required board permissions: {}",
                missing.join(", ")
            )));
        }

        Ok(access)
    }

    /// Ensures the actor owns or is a member of the board.
    pub async fn require_board_membership(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
    ) -> AppResult<BoardAccess> {
        self.require_board_permissions(actor, board_id, &[]).await
    }
}

#[cfg(test)]
mod tests;
