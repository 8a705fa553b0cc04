use super::*;

use tasklane_core::ListId;
use tasklane_domain::BoardList;

impl BoardService {
    /// Appends a list to the board.
    pub async fn create_list(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        title: &str,
    ) -> AppResult<BoardList> {
        self.access
            .require_board_permissions(actor, board_id, &[BoardPermission::ListCreate])
            .await?;
        let title = NonEmptyString::new(title.trim())?;

        let list = self.tasks.create_list(board_id, title.as_str()).await?;
        self.notifications.notify_board_members(
            board_id,
            actor.user_id(),
            NotificationType::ListCreated,
            Some(json!({ "boardId": board_id, "listId": list.id, "title": list.title })),
        );

        Ok(list)
    }

    /// Lists the board lists in position order.
    pub async fn list_lists(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
    ) -> AppResult<Vec<BoardList>> {
        self.access
            .require_board_membership(actor, board_id)
            .await?;
        self.tasks.list_lists(board_id).await
    }

    /// Renames a list.
    pub async fn rename_list(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        list_id: ListId,
        title: &str,
    ) -> AppResult<BoardList> {
        self.access
            .require_board_permissions(actor, board_id, &[BoardPermission::ListUpdate])
            .await?;
        let title = NonEmptyString::new(title.trim())?;

        let list = self
            .tasks
            .rename_list(board_id, list_id, title.as_str())
            .await?;
        self.notifications.notify_board_members(
            board_id,
            actor.user_id(),
            NotificationType::ListUpdated,
            Some(json!({ "boardId": board_id, "listId": list.id, "title": list.title })),
        );

        Ok(list)
    }

    /// Deletes a list and its tasks.
    pub async fn delete_list(
        &self,
        actor: &UserIdentity,
        board_id: BoardId,
        list_id: ListId,
    ) -> AppResult<()> {
        self.access
            .require_board_permissions(actor, board_id, &[BoardPermission::ListDelete])
            .await?;

        let list = self
            .tasks
            .find_list(board_id, list_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("list '{list_id}' does not exist")))?;
        self.tasks.delete_list(board_id, list_id).await?;

        self.notifications.notify_board_members(
            board_id,
            actor.user_id(),
            NotificationType::ListDeleted,
            Some(json!({ "boardId": board_id, "listId": list_id, "title": list.title })),
        );

        Ok(())
    }
}
