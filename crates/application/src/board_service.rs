//! Board, list and task operations guarded by board permissions.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tasklane_core::{AppError, AppResult, BoardId, NonEmptyString, UserIdentity};
use tasklane_domain::{Board, BoardPermission, NotificationDraft, NotificationType};

use crate::{
    BoardAccessService, BoardMemberRepository, BoardRepository, NotificationDispatcher,
    TaskRepository,
};

mod lists;
mod tasks;

/// Input payload for board creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBoardInput {
    /// Board title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Input payload for board updates. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBoardInput {
    /// New title.
    pub title: Option<String>,
    /// New description. `Some(None)` clears it.
    pub description: Option<Option<String>>,
}

/// Application service for boards and their lists and tasks.
#[derive(Clone)]
pub struct BoardService {
    access: BoardAccessService,
    boards: Arc<dyn BoardRepository>,
    tasks: Arc<dyn TaskRepository>,
    members: Arc<dyn BoardMemberRepository>,
    notifications: NotificationDispatcher,
}

impl BoardService {
    /// Creates a new board service.
    #[must_use]
    pub fn new(
        access: BoardAccessService,
        boards: Arc<dyn BoardRepository>,
        tasks: Arc<dyn TaskRepository>,
        members: Arc<dyn BoardMemberRepository>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            access,
            boards,
            tasks,
            members,
            notifications,
        }
    }

    /// Creates a board owned by the actor.
    pub async fn create_board(
        &self,
        actor: &UserIdentity,
        input: CreateBoardInput,
    ) -> AppResult<Board> {
        let title = NonEmptyString::new(input.title.trim())?;
        let now = Utc::now();

        self.boards
            .create_board(Board {
                id: BoardId::new(),
                title: title.as_str().to_owned(),
                description: normalize_description(input.description),
                owner_id: actor.user_id(),
                created_at: now,
                updated_at: now,
            })
            .await
    }

    /// Lists boards the actor owns or belongs to.
    pub async fn list_boards(&self, actor: &UserIdentity) -> AppResult<Vec<Board>> {
        self.boards.list_boards_for_user(actor.user_id()).await
    }

    /// Returns one board. Requires standing on the board.
    pub async fn get_board(&self, actor: &UserIdentity, board_id: BoardId) -> AppResult<Board> {
        let access = self
            .access
            .require_board_membership(actor, board_id)
            .await?;
        Ok(access.board)
    }

    /// Updates board title or description.
    pub async fn update_board(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        input: UpdateBoardInput,
    ) -> AppResult<Board> {
        let access = self
            .access
            .require_board_permissions(actor, board_id, &[BoardPermission::BoardUpdate])
            .await?;

        if input.title.is_none() && input.description.is_none() {
            return Err(AppError::Validation(
                "at least one board field must be provided".to_owned(),
            ));
        }

        let mut board = access.board;
        if let Some(title) = input.title {
            board.title = NonEmptyString::new(title.trim())?.as_str().to_owned();
        }
        if let Some(description) = input.description {
            board.description = normalize_description(description);
        }
        board.updated_at = Utc::now();

        self.boards.update_board(&board).await
    }

    /// Deletes a board and tells every former participant.
    pub async fn delete_board(&self, actor: &UserIdentity, board_id: BoardId) -> AppResult<()> {
        let access = self
            .access
            .require_board_permissions(actor, board_id, &[BoardPermission::BoardDelete])
            .await?;

        // Audience must be read before the cascade removes member rows.
        let audience = self.members.list_member_ids(board_id).await?;
        self.boards.delete_board(board_id).await?;

        let data = json!({ "boardId": board_id, "title": access.board.title });
        self.notifications.create_and_send(
            audience
                .into_iter()
                .filter(|user_id| *user_id != actor.user_id())
                .map(|user_id| {
                    NotificationDraft::new(user_id, NotificationType::BoardDeleted)
                        .with_reference(board_id.as_uuid())
                        .with_data(data.clone())
                })
                .collect(),
        );

        Ok(())
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
