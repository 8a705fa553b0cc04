use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tasklane_core::{AppError, NotificationId, UserId};
use uuid::Uuid;

/// Closed set of events that produce notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// A task was assigned to the recipient.
    TaskAssigned,
    /// The recipient was unassigned from a task.
    TaskUnassigned,
    /// A task the recipient works on was completed.
    TaskCompleted,
    /// A task is past its due date.
    TaskOverdue,
    /// A task moved to another list.
    TaskMoved,
    /// A task status changed.
    TaskStatusUpdated,
    /// A task due date changed.
    TaskDueDateUpdated,
    /// A comment was added to a task.
    CommentAdded,
    /// The recipient was mentioned in a comment.
    CommentMention,
    /// An attachment was added to a task.
    AttachmentAdded,
    /// An attachment was removed from a task.
    AttachmentDeleted,
    /// A list was created.
    ListCreated,
    /// A list was updated.
    ListUpdated,
    /// A list was deleted.
    ListDeleted,
    /// The recipient was invited to a board.
    BoardInvite,
    /// The recipient's board roles changed.
    BoardRoleUpdated,
    /// The recipient's board permissions changed.
    BoardPermissionsUpdated,
    /// A board was deleted.
    BoardDeleted,
    /// The recipient was removed from a board.
    BoardMemberRemoved,
    /// A member joined a board the recipient manages.
    MemberAdded,
    /// A member left a board the recipient manages.
    MemberRemoved,
    /// A member's roles changed on a board the recipient manages.
    MemberRoleUpdated,
    /// A member's permissions changed on a board the recipient manages.
    MemberPermissionUpdated,
    /// Anything else.
    General,
}

impl NotificationType {
    /// Returns a stable storage value for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskAssigned => "TASK_ASSIGNED",
            Self::TaskUnassigned => "TASK_UNASSIGNED",
            Self::TaskCompleted => "TASK_COMPLETED",
            Self::TaskOverdue => "TASK_OVERDUE",
            Self::TaskMoved => "TASK_MOVED",
            Self::TaskStatusUpdated => "TASK_STATUS_UPDATED",
            Self::TaskDueDateUpdated => "TASK_DUE_DATE_UPDATED",
            Self::CommentAdded => "COMMENT_ADDED",
            Self::CommentMention => "COMMENT_MENTION",
            Self::AttachmentAdded => "ATTACHMENT_ADDED",
            Self::AttachmentDeleted => "ATTACHMENT_DELETED",
            Self::ListCreated => "LIST_CREATED",
            Self::ListUpdated => "LIST_UPDATED",
            Self::ListDeleted => "LIST_DELETED",
            Self::BoardInvite => "BOARD_INVITE",
            Self::BoardRoleUpdated => "BOARD_ROLE_UPDATED",
            Self::BoardPermissionsUpdated => "BOARD_PERMISSIONS_UPDATED",
            Self::BoardDeleted => "BOARD_DELETED",
            Self::BoardMemberRemoved => "BOARD_MEMBER_REMOVED",
            Self::MemberAdded => "MEMBER_ADDED",
            Self::MemberRemoved => "MEMBER_REMOVED",
            Self::MemberRoleUpdated => "MEMBER_ROLE_UPDATED",
            Self::MemberPermissionUpdated => "MEMBER_PERMISSION_UPDATED",
            Self::General => "GENERAL",
        }
    }

    /// Returns the message used when an event does not carry its own.
    #[must_use]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::TaskAssigned => "A new task has been assigned to you.",
            Self::TaskUnassigned => "You have been unassigned from a task.",
            Self::TaskCompleted => "A task you were working on has been completed.",
            Self::TaskOverdue => "A task is overdue. Please check it.",
            Self::TaskMoved => "A task has been moved to another list.",
            Self::TaskStatusUpdated => "A task status has been updated.",
            Self::TaskDueDateUpdated => "A task due date has been updated.",
            Self::CommentAdded => "A new comment has been added to a task.",
            Self::CommentMention => "You have been mentioned in a comment.",
            Self::AttachmentAdded => "A new attachment has been added to a task.",
            Self::AttachmentDeleted => "An attachment has been removed from a task.",
            Self::ListCreated => "A new list has been created.",
            Self::ListUpdated => "A list has been updated.",
            Self::ListDeleted => "A list has been deleted.",
            Self::BoardInvite => "You have been invited to a board.",
            Self::BoardRoleUpdated => "Your role in the board has been updated.",
            Self::BoardPermissionsUpdated => "Your permissions in the board have been updated.",
            Self::BoardDeleted => "A board has been deleted.",
            Self::BoardMemberRemoved => "You have been removed from a board.",
            Self::MemberAdded => "A new member has been added.",
            Self::MemberRemoved => "A member has been removed.",
            Self::MemberRoleUpdated => "A member's role has been updated.",
            Self::MemberPermissionUpdated => "A member's permissions have been updated.",
            Self::General => "You have a new notification.",
        }
    }
}

impl FromStr for NotificationType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(Value::String(value.to_owned()))
            .map_err(|_| AppError::Validation(format!("unknown notification type '{value}'")))
    }
}

/// Event addressed to one user, before it is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    /// Recipient.
    pub user_id: UserId,
    /// Event kind.
    pub notification_type: NotificationType,
    /// Related resource, usually the board.
    pub reference_id: Option<Uuid>,
    /// Message override.
    pub message: Option<String>,
    /// Structured payload.
    pub data: Option<Value>,
}

impl NotificationDraft {
    /// Creates a draft with the default message and no payload.
    #[must_use]
    pub fn new(user_id: UserId, notification_type: NotificationType) -> Self {
        Self {
            user_id,
            notification_type,
            reference_id: None,
            message: None,
            data: None,
        }
    }

    /// Sets the related resource.
    #[must_use]
    pub fn with_reference(mut self, reference_id: Uuid) -> Self {
        self.reference_id = Some(reference_id);
        self
    }

    /// Overrides the default message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches a structured payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Returns the explicit message or the type's default one.
    #[must_use]
    pub fn resolved_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| self.notification_type.default_message().to_owned())
    }
}

/// Persisted notification. Only `is_read` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification identifier.
    pub id: NotificationId,
    /// Recipient.
    pub user_id: UserId,
    /// Related resource, usually the board.
    pub reference_id: Option<Uuid>,
    /// Event kind.
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// Human-readable message.
    pub message: String,
    /// Structured payload.
    pub data: Option<Value>,
    /// Read flag, flips once from false to true.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
