//! PostgreSQL-backed boards, lists, tasks and task assignees.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use tasklane_application::{BoardRepository, TaskRepository};
use tasklane_core::{AppError, AppResult, BoardId, ListId, TaskId, UserId};
use tasklane_domain::{Board, BoardList, Task, TaskStatus};

use crate::database_error::map_database_error;

/// PostgreSQL implementation of the board and task repository ports.
#[derive(Clone)]
pub struct PostgresBoardRepository {
    pool: PgPool,
}

impl PostgresBoardRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BoardRow {
    id: uuid::Uuid,
    title: String,
    description: Option<String>,
    owner_id: uuid::Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BoardRow> for Board {
    fn from(row: BoardRow) -> Self {
        Self {
            id: BoardId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            owner_id: UserId::from_uuid(row.owner_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ListRow {
    id: uuid::Uuid,
    board_id: uuid::Uuid,
    title: String,
    position: i32,
    created_at: DateTime<Utc>,
}

impl From<ListRow> for BoardList {
    fn from(row: ListRow) -> Self {
        Self {
            id: ListId::from_uuid(row.id),
            board_id: BoardId::from_uuid(row.board_id),
            title: row.title,
            position: row.position,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: uuid::Uuid,
    board_id: uuid::Uuid,
    list_id: uuid::Uuid,
    title: String,
    description: Option<String>,
    status: String,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = AppError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = TaskStatus::from_str(row.status.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode status of task '{}': {error}",
                row.id
            ))
        })?;

        Ok(Self {
            id: TaskId::from_uuid(row.id),
            board_id: BoardId::from_uuid(row.board_id),
            list_id: ListId::from_uuid(row.list_id),
            title: row.title,
            description: row.description,
            status,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

mod lists;
mod tasks;

#[async_trait]
impl BoardRepository for PostgresBoardRepository {
    async fn create_board(&self, board: Board) -> AppResult<Board> {
        let row = sqlx::query_as::<_, BoardRow>(
            r#"
            INSERT INTO boards (id, title, description, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(board.id.as_uuid())
        .bind(board.title.as_str())
        .bind(board.description.as_deref())
        .bind(board.owner_id.as_uuid())
        .bind(board.created_at)
        .bind(board.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "create board"))?;

        Ok(Board::from(row))
    }

    async fn find_board(&self, board_id: BoardId) -> AppResult<Option<Board>> {
        let row = sqlx::query_as::<_, BoardRow>(
            r#"
            SELECT id, title, description, owner_id, created_at, updated_at
            FROM boards
            WHERE id = $1
            "#,
        )
        .bind(board_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "find board"))?;

        Ok(row.map(Board::from))
    }

    async fn list_boards_for_user(&self, user_id: UserId) -> AppResult<Vec<Board>> {
        let rows = sqlx::query_as::<_, BoardRow>(
            r#"
            SELECT boards.id, boards.title, boards.description, boards.owner_id,
                   boards.created_at, boards.updated_at
            FROM boards
            LEFT JOIN board_members AS members
                ON members.board_id = boards.id
                AND members.member_id = $1
            WHERE boards.owner_id = $1
                OR members.member_id IS NOT NULL
            ORDER BY boards.created_at DESC, boards.id
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "list boards"))?;

        Ok(rows.into_iter().map(Board::from).collect())
    }

    async fn update_board(&self, board: &Board) -> AppResult<Board> {
        let row = sqlx::query_as::<_, BoardRow>(
            r#"
            UPDATE boards
            SET title = $2, description = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, title, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(board.id.as_uuid())
        .bind(board.title.as_str())
        .bind(board.description.as_deref())
        .bind(board.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "update board"))?
        .ok_or_else(|| AppError::NotFound(format!("board '{}' does not exist", board.id)))?;

        Ok(Board::from(row))
    }

    async fn delete_board(&self, board_id: BoardId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(board_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| map_database_error(error, "delete board"))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "board '{board_id}' does not exist"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl TaskRepository for PostgresBoardRepository {
    async fn create_list(&self, board_id: BoardId, title: &str) -> AppResult<BoardList> {
        self.create_list_impl(board_id, title).await
    }

    async fn find_list(
        &self,
        board_id: BoardId,
        list_id: ListId,
    ) -> AppResult<Option<BoardList>> {
        self.find_list_impl(board_id, list_id).await
    }

    async fn list_lists(&self, board_id: BoardId) -> AppResult<Vec<BoardList>> {
        self.list_lists_impl(board_id).await
    }

    async fn rename_list(
        &self,
        board_id: BoardId,
        list_id: ListId,
        title: &str,
    ) -> AppResult<BoardList> {
        self.rename_list_impl(board_id, list_id, title).await
    }

    async fn delete_list(&self, board_id: BoardId, list_id: ListId) -> AppResult<()> {
        self.delete_list_impl(board_id, list_id).await
    }

    async fn create_task(&self, task: Task) -> AppResult<Task> {
        self.create_task_impl(task).await
    }

    async fn find_task(&self, board_id: BoardId, task_id: TaskId) -> AppResult<Option<Task>> {
        self.find_task_impl(board_id, task_id).await
    }

    async fn list_tasks(&self, board_id: BoardId, list_id: ListId) -> AppResult<Vec<Task>> {
        self.list_tasks_impl(board_id, list_id).await
    }

    async fn save_task(&self, task: &Task) -> AppResult<Task> {
        self.save_task_impl(task).await
    }

    async fn delete_task(&self, board_id: BoardId, task_id: TaskId) -> AppResult<()> {
        self.delete_task_impl(board_id, task_id).await
    }

    async fn add_task_assignees(
        &self,
        task_id: TaskId,
        member_ids: &[UserId],
    ) -> AppResult<Vec<UserId>> {
        self.add_task_assignees_impl(task_id, member_ids).await
    }

    async fn remove_task_assignees(
        &self,
        task_id: TaskId,
        member_ids: &[UserId],
    ) -> AppResult<Vec<UserId>> {
        self.remove_task_assignees_impl(task_id, member_ids).await
    }
}

fn uuids(ids: &[UserId]) -> Vec<uuid::Uuid> {
    ids.iter().map(UserId::as_uuid).collect()
}
