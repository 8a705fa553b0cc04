//! Notification persistence, audience fan-out and background delivery.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tasklane_core::{AppError, AppResult, BoardId, NotificationId, TaskId, UserId, UserIdentity};
use tasklane_domain::{Notification, NotificationDraft, NotificationType};

use crate::{BoardMemberRepository, NotificationPublisher, NotificationRepository};

mod dispatch;

pub use dispatch::{
    NotificationDispatcher, NotificationJob, NotificationJobReceiver, run_notification_worker,
};

/// Largest page size accepted by [`NotificationService::list_for_user`].
pub const MAX_NOTIFICATION_PAGE_SIZE: u32 = 100;

/// One page of a user's notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPage {
    /// Notifications on this page, newest first.
    pub items: Vec<Notification>,
    /// Total notifications stored for the user.
    pub total: u64,
    /// Unread notifications stored for the user.
    pub unread: u64,
    /// Applied page size.
    pub limit: u32,
    /// Applied offset.
    pub offset: u32,
}

/// Audience selector for board-scoped fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAudience {
    /// Owner and every member.
    Members,
    /// Owner and members holding the manager role.
    OwnerAndManagers,
}

/// Application service that persists notifications and pushes them to live clients.
#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
    members: Arc<dyn BoardMemberRepository>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl NotificationService {
    /// Creates a new notification service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn NotificationRepository>,
        members: Arc<dyn BoardMemberRepository>,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            repository,
            members,
            publisher,
        }
    }

    /// Persists one notification per draft without publishing.
    pub async fn create(&self, drafts: Vec<NotificationDraft>) -> AppResult<Vec<Notification>> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let notifications: Vec<Notification> = drafts
            .into_iter()
            .map(|draft| Notification {
                id: NotificationId::new(),
                user_id: draft.user_id,
                reference_id: draft.reference_id,
                message: draft.resolved_message(),
                notification_type: draft.notification_type,
                data: draft.data,
                is_read: false,
                created_at: now,
            })
            .collect();

        self.repository.insert_notifications(&notifications).await?;
        Ok(notifications)
    }

    /// Persists drafts, then pushes them to connected recipients.
    ///
    /// Publish failures are logged and do not fail the call.
    pub async fn create_and_publish(
        &self,
        drafts: Vec<NotificationDraft>,
    ) -> AppResult<Vec<Notification>> {
        let notifications = self.create(drafts).await?;
        if notifications.is_empty() {
            return Ok(notifications);
        }

        match self.publisher.publish(&notifications).await {
            Ok(delivered) => tracing::debug!(
                persisted = notifications.len(),
                delivered,
                "notifications published"
            ),
            Err(error) => tracing::warn!(
                error = %error,
                persisted = notifications.len(),
                "failed to publish notifications"
            ),
        }

        Ok(notifications)
    }

    /// Resolves a board audience, leaves out `excluded_user_ids`, and notifies the rest.
    pub async fn notify_board(
        &self,
        board_id: BoardId,
        audience: BoardAudience,
        excluded_user_ids: &[UserId],
        notification_type: NotificationType,
        data: Option<Value>,
    ) -> AppResult<Vec<Notification>> {
        let recipients = match audience {
            BoardAudience::Members => self.members.list_member_ids(board_id).await?,
            BoardAudience::OwnerAndManagers => {
                self.members.list_owner_and_manager_ids(board_id).await?
            }
        };

        let drafts = drafts_for(
            recipients,
            excluded_user_ids,
            notification_type,
            board_id,
            data,
        );
        self.create_and_publish(drafts).await
    }

    /// Notifies the owner and every member of a board except `exclude_user_id`.
    pub async fn notify_board_members(
        &self,
        board_id: BoardId,
        exclude_user_id: UserId,
        notification_type: NotificationType,
        data: Option<Value>,
    ) -> AppResult<Vec<Notification>> {
        self.notify_board(
            board_id,
            BoardAudience::Members,
            &[exclude_user_id],
            notification_type,
            data,
        )
        .await
    }

    /// Notifies the owner and managers of a board except `exclude_user_id`.
    pub async fn notify_board_owner_and_managers(
        &self,
        board_id: BoardId,
        exclude_user_id: UserId,
        notification_type: NotificationType,
        data: Option<Value>,
    ) -> AppResult<Vec<Notification>> {
        self.notify_board(
            board_id,
            BoardAudience::OwnerAndManagers,
            &[exclude_user_id],
            notification_type,
            data,
        )
        .await
    }

    /// Notifies the assignees of a task except `exclude_user_id`.
    pub async fn notify_task_assignees(
        &self,
        board_id: BoardId,
        task_id: TaskId,
        exclude_user_id: UserId,
        notification_type: NotificationType,
        data: Option<Value>,
    ) -> AppResult<Vec<Notification>> {
        let recipients = self.members.list_task_assignee_ids(task_id).await?;
        let drafts = drafts_for(
            recipients,
            &[exclude_user_id],
            notification_type,
            board_id,
            data,
        );
        self.create_and_publish(drafts).await
    }

    /// Executes one queued delivery job.
    pub async fn deliver(&self, job: NotificationJob) -> AppResult<Vec<Notification>> {
        match job {
            NotificationJob::Direct(drafts) => self.create_and_publish(drafts).await,
            NotificationJob::Board {
                board_id,
                audience,
                excluded_user_ids,
                notification_type,
                data,
            } => {
                self.notify_board(
                    board_id,
                    audience,
                    &excluded_user_ids,
                    notification_type,
                    data,
                )
                .await
            }
            NotificationJob::TaskAssignees {
                board_id,
                task_id,
                exclude_user_id,
                notification_type,
                data,
            } => {
                self.notify_task_assignees(
                    board_id,
                    task_id,
                    exclude_user_id,
                    notification_type,
                    data,
                )
                .await
            }
        }
    }

    /// Lists the caller's notifications, newest first.
    pub async fn list_for_user(
        &self,
        actor: &UserIdentity,
        limit: u32,
        offset: u32,
    ) -> AppResult<NotificationPage> {
        if limit == 0 || limit > MAX_NOTIFICATION_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_NOTIFICATION_PAGE_SIZE}"
            )));
        }

        let user_id = actor.user_id();
        let items = self
            .repository
            .list_for_user(user_id, limit, offset)
            .await?;
        let total = self.repository.count_for_user(user_id).await?;
        let unread = self.repository.count_unread_for_user(user_id).await?;

        Ok(NotificationPage {
            items,
            total,
            unread,
            limit,
            offset,
        })
    }

    /// Marks a notification as read. Repeated calls leave it read.
    pub async fn mark_read(&self, notification_id: NotificationId) -> AppResult<Notification> {
        self.repository
            .mark_read(notification_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("notification '{notification_id}' does not exist"))
            })
    }

    /// Marks one of the caller's own notifications as read.
    ///
    /// Notifications addressed to other users are reported as missing.
    pub async fn mark_read_for_user(
        &self,
        actor: &UserIdentity,
        notification_id: NotificationId,
    ) -> AppResult<Notification> {
        let notification = self
            .repository
            .find_notification(notification_id)
            .await?
            .filter(|notification| notification.user_id == actor.user_id())
            .ok_or_else(|| {
                AppError::NotFound(format!("notification '{notification_id}' does not exist"))
            })?;

        if notification.is_read {
            return Ok(notification);
        }

        self.mark_read(notification_id).await
    }

    /// Marks every notification of the caller as read.
    pub async fn mark_all_read(&self, actor: &UserIdentity) -> AppResult<u64> {
        self.repository.mark_all_read(actor.user_id()).await
    }
}

fn drafts_for(
    recipients: Vec<UserId>,
    excluded_user_ids: &[UserId],
    notification_type: NotificationType,
    board_id: BoardId,
    data: Option<Value>,
) -> Vec<NotificationDraft> {
    let mut seen = BTreeSet::new();
    recipients
        .into_iter()
        .filter(|user_id| !excluded_user_ids.contains(user_id) && seen.insert(*user_id))
        .map(|user_id| {
            let draft = NotificationDraft::new(user_id, notification_type)
                .with_reference(board_id.as_uuid());
            match &data {
                Some(data) => draft.with_data(data.clone()),
                None => draft,
            }
        })
        .collect()
}
