use super::*;

impl PostgresBoardMemberRepository {
    /// Owner first, then members in join order. The owner appears once even
    /// if a membership row exists for them.
    pub(super) async fn list_audience_ids(
        &self,
        board_id: BoardId,
        managers_only: bool,
    ) -> AppResult<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT audience.user_id
            FROM (
                SELECT owner_id AS user_id, 0 AS sort_group, created_at
                FROM boards
                WHERE id = $1
                UNION ALL
                SELECT members.member_id, 1, members.created_at
                FROM board_members AS members
                INNER JOIN boards ON boards.id = members.board_id
                WHERE members.board_id = $1
                    AND members.member_id <> boards.owner_id
                    AND (NOT $2 OR $3 = ANY(members.roles))
            ) AS audience
            ORDER BY audience.sort_group, audience.created_at, audience.user_id
            "#,
        )
        .bind(board_id.as_uuid())
        .bind(managers_only)
        .bind(BoardRole::Manager.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "resolve board audience"))?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }

    pub(super) async fn list_task_assignee_ids_impl(
        &self,
        task_id: TaskId,
    ) -> AppResult<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT member_id
            FROM task_assignees
            WHERE task_id = $1
            ORDER BY created_at, member_id
            "#,
        )
        .bind(task_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "list task assignees"))?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }
}
