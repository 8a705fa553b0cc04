//! PostgreSQL-backed board membership rows.
//!
//! Roles and permissions live in `TEXT[]` columns so a role change and its
//! recomputed permission set are written by one `UPDATE`.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use tasklane_application::{BoardMemberRepository, BoardStanding};
use tasklane_core::{AppError, AppResult, BoardId, TaskId, UserId};
use tasklane_domain::{Board, BoardMember, BoardPermission, BoardRole};

use crate::database_error::{is_foreign_key_violation, map_database_error};

/// PostgreSQL implementation of the board member repository port.
#[derive(Clone)]
pub struct PostgresBoardMemberRepository {
    pool: PgPool,
}

impl PostgresBoardMemberRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MemberRow {
    board_id: uuid::Uuid,
    member_id: uuid::Uuid,
    roles: Vec<String>,
    permissions: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for BoardMember {
    type Error = AppError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let roles = decode_values::<BoardRole>(&row.roles, row.board_id, row.member_id)?;
        let permissions =
            decode_values::<BoardPermission>(&row.permissions, row.board_id, row.member_id)?;

        BoardMember::restore(
            BoardId::from_uuid(row.board_id),
            UserId::from_uuid(row.member_id),
            roles,
            permissions,
            row.created_at,
            row.updated_at,
        )
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to restore membership '{}:{}': {error}",
                row.board_id, row.member_id
            ))
        })
    }
}

#[derive(Debug, FromRow)]
struct StandingRow {
    id: uuid::Uuid,
    title: String,
    description: Option<String>,
    owner_id: uuid::Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    member_id: Option<uuid::Uuid>,
    roles: Option<Vec<String>>,
    permissions: Option<Vec<String>>,
    member_created_at: Option<DateTime<Utc>>,
    member_updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<StandingRow> for BoardStanding {
    type Error = AppError;

    fn try_from(row: StandingRow) -> Result<Self, Self::Error> {
        let membership = match (
            row.member_id,
            row.roles,
            row.permissions,
            row.member_created_at,
            row.member_updated_at,
        ) {
            (Some(member_id), Some(roles), Some(permissions), Some(created_at), Some(updated_at)) => {
                Some(BoardMember::try_from(MemberRow {
                    board_id: row.id,
                    member_id,
                    roles,
                    permissions,
                    created_at,
                    updated_at,
                })?)
            }
            _ => None,
        };

        Ok(Self {
            board: Board {
                id: BoardId::from_uuid(row.id),
                title: row.title,
                description: row.description,
                owner_id: UserId::from_uuid(row.owner_id),
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            membership,
        })
    }
}

fn decode_values<T>(values: &[String], board_id: uuid::Uuid, member_id: uuid::Uuid) -> AppResult<Vec<T>>
where
    T: FromStr<Err = AppError>,
{
    values
        .iter()
        .map(|value| {
            T::from_str(value).map_err(|error| {
                AppError::Internal(format!(
                    "failed to decode membership '{board_id}:{member_id}': {error}"
                ))
            })
        })
        .collect()
}

fn role_values(member: &BoardMember) -> Vec<String> {
    member
        .roles()
        .iter()
        .map(|role| role.as_str().to_owned())
        .collect()
}

fn permission_values(member: &BoardMember) -> Vec<String> {
    member
        .permissions()
        .iter()
        .map(|permission| permission.as_str().to_owned())
        .collect()
}

mod audience;

#[async_trait]
impl BoardMemberRepository for PostgresBoardMemberRepository {
    async fn find_standing(
        &self,
        board_id: BoardId,
        user_id: UserId,
    ) -> AppResult<Option<BoardStanding>> {
        sqlx::query_as::<_, StandingRow>(
            r#"
            SELECT boards.id, boards.title, boards.description, boards.owner_id,
                   boards.created_at, boards.updated_at,
                   members.member_id, members.roles, members.permissions,
                   members.created_at AS member_created_at,
                   members.updated_at AS member_updated_at
            FROM boards
            LEFT JOIN board_members AS members
                ON members.board_id = boards.id
                AND members.member_id = $2
            WHERE boards.id = $1
            "#,
        )
        .bind(board_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "resolve board standing"))?
        .map(BoardStanding::try_from)
        .transpose()
    }

    async fn find_member(
        &self,
        board_id: BoardId,
        member_id: UserId,
    ) -> AppResult<Option<BoardMember>> {
        sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT board_id, member_id, roles, permissions, created_at, updated_at
            FROM board_members
            WHERE board_id = $1 AND member_id = $2
            "#,
        )
        .bind(board_id.as_uuid())
        .bind(member_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "find board member"))?
        .map(BoardMember::try_from)
        .transpose()
    }

    async fn list_members(&self, board_id: BoardId) -> AppResult<Vec<BoardMember>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT board_id, member_id, roles, permissions, created_at, updated_at
            FROM board_members
            WHERE board_id = $1
            ORDER BY created_at, member_id
            "#,
        )
        .bind(board_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "list board members"))?;

        rows.into_iter().map(BoardMember::try_from).collect()
    }

    async fn add_members(
        &self,
        board_id: BoardId,
        members: Vec<BoardMember>,
    ) -> AppResult<Vec<BoardMember>> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let mut inserted = Vec::with_capacity(members.len());
        for member in &members {
            let row = sqlx::query_as::<_, MemberRow>(
                r#"
                INSERT INTO board_members (
                    board_id, member_id, roles, permissions, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (board_id, member_id) DO NOTHING
                RETURNING board_id, member_id, roles, permissions, created_at, updated_at
                "#,
            )
            .bind(board_id.as_uuid())
            .bind(member.member_id().as_uuid())
            .bind(role_values(member))
            .bind(permission_values(member))
            .bind(member.created_at())
            .bind(member.updated_at())
            .fetch_optional(&mut *transaction)
            .await
            .map_err(|error| {
                if is_foreign_key_violation(&error) {
                    return AppError::Validation(format!(
                        "user '{}' does not exist",
                        member.member_id()
                    ));
                }
                map_database_error(error, "add board member")
            })?;

            if let Some(row) = row {
                inserted.push(BoardMember::try_from(row)?);
            }
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(inserted)
    }

    async fn save_member(&self, member: &BoardMember) -> AppResult<BoardMember> {
        sqlx::query_as::<_, MemberRow>(
            r#"
            UPDATE board_members
            SET roles = $3, permissions = $4, updated_at = $5
            WHERE board_id = $1 AND member_id = $2
            RETURNING board_id, member_id, roles, permissions, created_at, updated_at
            "#,
        )
        .bind(member.board_id().as_uuid())
        .bind(member.member_id().as_uuid())
        .bind(role_values(member))
        .bind(permission_values(member))
        .bind(member.updated_at())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "save board member"))?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "member '{}' does not belong to board '{}'",
                member.member_id(),
                member.board_id()
            ))
        })
        .and_then(BoardMember::try_from)
    }

    async fn remove_members(
        &self,
        board_id: BoardId,
        member_ids: &[UserId],
    ) -> AppResult<Vec<UserId>> {
        let member_uuids: Vec<uuid::Uuid> = member_ids.iter().map(UserId::as_uuid).collect();
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let removed = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            DELETE FROM board_members
            WHERE board_id = $1 AND member_id = ANY($2)
            RETURNING member_id
            "#,
        )
        .bind(board_id.as_uuid())
        .bind(&member_uuids)
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| map_database_error(error, "remove board members"))?;

        // Removed members keep no task assignments on the board.
        sqlx::query(
            r#"
            DELETE FROM task_assignees AS assignees
            USING tasks
            WHERE assignees.task_id = tasks.id
                AND tasks.board_id = $1
                AND assignees.member_id = ANY($2)
            "#,
        )
        .bind(board_id.as_uuid())
        .bind(&removed)
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_database_error(error, "clear task assignments"))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(removed.into_iter().map(UserId::from_uuid).collect())
    }

    async fn list_member_ids(&self, board_id: BoardId) -> AppResult<Vec<UserId>> {
        self.list_audience_ids(board_id, false).await
    }

    async fn list_owner_and_manager_ids(&self, board_id: BoardId) -> AppResult<Vec<UserId>> {
        self.list_audience_ids(board_id, true).await
    }

    async fn list_task_assignee_ids(&self, task_id: TaskId) -> AppResult<Vec<UserId>> {
        self.list_task_assignee_ids_impl(task_id).await
    }
}
