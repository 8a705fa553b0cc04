use async_trait::async_trait;
use tasklane_core::{AppResult, NotificationId, UserId};
use tasklane_domain::Notification;

/// Repository port for persisted notifications.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persists a batch of notifications.
    async fn insert_notifications(&self, notifications: &[Notification]) -> AppResult<()>;

    /// Lists one user's notifications, newest first.
    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: u32,
        offset: u32,
    ) -> AppResult<Vec<Notification>>;

    /// Counts one user's notifications.
    async fn count_for_user(&self, user_id: UserId) -> AppResult<u64>;

    /// Counts one user's unread notifications.
    async fn count_unread_for_user(&self, user_id: UserId) -> AppResult<u64>;

    /// Finds a notification by id.
    async fn find_notification(
        &self,
        notification_id: NotificationId,
    ) -> AppResult<Option<Notification>>;

    /// Sets the read flag and returns the stored record.
    ///
    /// Returns `None` when the notification does not exist.
    async fn mark_read(&self, notification_id: NotificationId) -> AppResult<Option<Notification>>;

    /// Marks every unread notification of a user as read and returns how many flipped.
    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64>;
}

/// Port for pushing persisted notifications to connected clients.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// Pushes each notification to its recipient's live connections.
    ///
    /// Returns the number of frames delivered. Offline recipients are skipped.
    async fn publish(&self, notifications: &[Notification]) -> AppResult<usize>;
}
