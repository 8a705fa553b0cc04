use super::*;

impl PostgresBoardRepository {
    pub(super) async fn create_list_impl(
        &self,
        board_id: BoardId,
        title: &str,
    ) -> AppResult<BoardList> {
        let row = sqlx::query_as::<_, ListRow>(
            r#"
            INSERT INTO lists (id, board_id, title, position)
            SELECT $1, $2, $3, COALESCE(MAX(position) + 1, 0)
            FROM lists
            WHERE board_id = $2
            RETURNING id, board_id, title, position, created_at
            "#,
        )
        .bind(ListId::new().as_uuid())
        .bind(board_id.as_uuid())
        .bind(title)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "create list"))?;

        Ok(BoardList::from(row))
    }

    pub(super) async fn find_list_impl(
        &self,
        board_id: BoardId,
        list_id: ListId,
    ) -> AppResult<Option<BoardList>> {
        let row = sqlx::query_as::<_, ListRow>(
            r#"
            SELECT id, board_id, title, position, created_at
            FROM lists
            WHERE board_id = $1 AND id = $2
            "#,
        )
        .bind(board_id.as_uuid())
        .bind(list_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "find list"))?;

        Ok(row.map(BoardList::from))
    }

    pub(super) async fn list_lists_impl(&self, board_id: BoardId) -> AppResult<Vec<BoardList>> {
        let rows = sqlx::query_as::<_, ListRow>(
            r#"
            SELECT id, board_id, title, position, created_at
            FROM lists
            WHERE board_id = $1
            ORDER BY position, created_at
            "#,
        )
        .bind(board_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "list lists"))?;

        Ok(rows.into_iter().map(BoardList::from).collect())
    }

    pub(super) async fn rename_list_impl(
        &self,
        board_id: BoardId,
        list_id: ListId,
        title: &str,
    ) -> AppResult<BoardList> {
        let row = sqlx::query_as::<_, ListRow>(
            r#"
            UPDATE lists
            SET title = $3
            WHERE board_id = $1 AND id = $2
            RETURNING id, board_id, title, position, created_at
            "#,
        )
        .bind(board_id.as_uuid())
        .bind(list_id.as_uuid())
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "rename list"))?
        .ok_or_else(|| AppError::NotFound(format!("list '{list_id}' does not exist")))?;

        Ok(BoardList::from(row))
    }

    pub(super) async fn delete_list_impl(&self, board_id: BoardId, list_id: ListId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM lists WHERE board_id = $1 AND id = $2")
            .bind(board_id.as_uuid())
            .bind(list_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| map_database_error(error, "delete list"))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("list '{list_id}' does not exist")));
        }

        Ok(())
    }
}
