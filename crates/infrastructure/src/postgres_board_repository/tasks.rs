use super::*;

impl PostgresBoardRepository {
    pub(super) async fn create_task_impl(&self, task: Task) -> AppResult<Task> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            INSERT INTO tasks (
                id, board_id, list_id, title, description, status, due_date,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, board_id, list_id, title, description, status, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(task.id.as_uuid())
        .bind(task.board_id.as_uuid())
        .bind(task.list_id.as_uuid())
        .bind(task.title.as_str())
        .bind(task.description.as_deref())
        .bind(task.status.as_str())
        .bind(task.due_date)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "create task"))?;

        Task::try_from(row)
    }

    pub(super) async fn find_task_impl(
        &self,
        board_id: BoardId,
        task_id: TaskId,
    ) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, board_id, list_id, title, description, status, due_date,
                   created_at, updated_at
            FROM tasks
            WHERE board_id = $1 AND id = $2
            "#,
        )
        .bind(board_id.as_uuid())
        .bind(task_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "find task"))?
        .map(Task::try_from)
        .transpose()
    }

    pub(super) async fn list_tasks_impl(
        &self,
        board_id: BoardId,
        list_id: ListId,
    ) -> AppResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, board_id, list_id, title, description, status, due_date,
                   created_at, updated_at
            FROM tasks
            WHERE board_id = $1 AND list_id = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(board_id.as_uuid())
        .bind(list_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "list tasks"))?;

        rows.into_iter().map(Task::try_from).collect()
    }

    pub(super) async fn save_task_impl(&self, task: &Task) -> AppResult<Task> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks
            SET list_id = $3, title = $4, description = $5, status = $6,
                due_date = $7, updated_at = $8
            WHERE board_id = $1 AND id = $2
            RETURNING id, board_id, list_id, title, description, status, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(task.board_id.as_uuid())
        .bind(task.id.as_uuid())
        .bind(task.list_id.as_uuid())
        .bind(task.title.as_str())
        .bind(task.description.as_deref())
        .bind(task.status.as_str())
        .bind(task.due_date)
        .bind(task.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "save task"))?
        .ok_or_else(|| AppError::NotFound(format!("task '{}' does not exist", task.id)))?;

        Task::try_from(row)
    }

    pub(super) async fn delete_task_impl(&self, board_id: BoardId, task_id: TaskId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM tasks WHERE board_id = $1 AND id = $2")
            .bind(board_id.as_uuid())
            .bind(task_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| map_database_error(error, "delete task"))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("task '{task_id}' does not exist")));
        }

        Ok(())
    }

    pub(super) async fn add_task_assignees_impl(
        &self,
        task_id: TaskId,
        member_ids: &[UserId],
    ) -> AppResult<Vec<UserId>> {
        let inserted = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO task_assignees (task_id, member_id)
            SELECT $1, assignee
            FROM UNNEST($2::UUID[]) AS assignee
            ON CONFLICT (task_id, member_id) DO NOTHING
            RETURNING member_id
            "#,
        )
        .bind(task_id.as_uuid())
        .bind(uuids(member_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "assign task"))?;

        Ok(inserted.into_iter().map(UserId::from_uuid).collect())
    }

    pub(super) async fn remove_task_assignees_impl(
        &self,
        task_id: TaskId,
        member_ids: &[UserId],
    ) -> AppResult<Vec<UserId>> {
        let removed = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            DELETE FROM task_assignees
            WHERE task_id = $1 AND member_id = ANY($2)
            RETURNING member_id
            "#,
        )
        .bind(task_id.as_uuid())
        .bind(uuids(member_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "unassign task"))?;

        Ok(removed.into_iter().map(UserId::from_uuid).collect())
    }
}
