//! PostgreSQL-backed notification store.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use tasklane_application::NotificationRepository;
use tasklane_core::{AppError, AppResult, NotificationId, UserId};
use tasklane_domain::{Notification, NotificationType};

use crate::database_error::{map_database_error, to_count};

/// PostgreSQL implementation of the notification repository port.
#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    reference_id: Option<uuid::Uuid>,
    #[sqlx(rename = "type")]
    notification_type: String,
    message: String,
    data: Option<serde_json::Value>,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let notification_type =
            NotificationType::from_str(row.notification_type.as_str()).map_err(|error| {
                AppError::Internal(format!(
                    "failed to decode type of notification '{}': {error}",
                    row.id
                ))
            })?;

        Ok(Self {
            id: NotificationId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            reference_id: row.reference_id,
            notification_type,
            message: row.message,
            data: row.data,
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests;

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn insert_notifications(&self, notifications: &[Notification]) -> AppResult<()> {
        if notifications.is_empty() {
            return Ok(());
        }

        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        for notification in notifications {
            sqlx::query(
                r#"
                INSERT INTO notifications (
                    id, user_id, reference_id, type, message, data, is_read, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(notification.id.as_uuid())
            .bind(notification.user_id.as_uuid())
            .bind(notification.reference_id)
            .bind(notification.notification_type.as_str())
            .bind(notification.message.as_str())
            .bind(notification.data.clone())
            .bind(notification.is_read)
            .bind(notification.created_at)
            .execute(&mut *transaction)
            .await
            .map_err(|error| map_database_error(error, "persist notification"))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, reference_id, type, message, data, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "list notifications"))?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn count_for_user(&self, user_id: UserId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "count notifications"))?;

        Ok(to_count(count))
    }

    async fn count_unread_for_user(&self, user_id: UserId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "count unread notifications"))?;

        Ok(to_count(count))
    }

    async fn find_notification(
        &self,
        notification_id: NotificationId,
    ) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, reference_id, type, message, data, is_read, created_at
            FROM notifications
            WHERE id = $1
            "#,
        )
        .bind(notification_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "find notification"))?
        .map(Notification::try_from)
        .transpose()
    }

    async fn mark_read(&self, notification_id: NotificationId) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notifications
            SET is_read = true
            WHERE id = $1
            RETURNING id, user_id, reference_id, type, message, data, is_read, created_at
            "#,
        )
        .bind(notification_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "mark notification read"))?
        .map(Notification::try_from)
        .transpose()
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let rows_affected = sqlx::query(
            "UPDATE notifications SET is_read = true WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| map_database_error(error, "mark notifications read"))?
        .rows_affected();

        Ok(rows_affected)
    }
}
