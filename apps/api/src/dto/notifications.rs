use serde::{Deserialize, Serialize};
use serde_json::Value;
use tasklane_application::NotificationPage;
use tasklane_domain::Notification;
use ts_rs::TS;

/// Default page size for notification listings.
pub const DEFAULT_NOTIFICATION_LIMIT: u32 = 20;

/// Query parameters for notification listings.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl NotificationListQuery {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_NOTIFICATION_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

/// API representation of a persisted notification.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/notification-response.ts"
)]
pub struct NotificationResponse {
    pub id: String,
    pub user_id: String,
    pub reference_id: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub message: String,
    #[ts(type = "unknown")]
    pub data: Option<Value>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            user_id: notification.user_id.to_string(),
            reference_id: notification.reference_id.map(|id| id.to_string()),
            notification_type: notification.notification_type.as_str().to_owned(),
            message: notification.message,
            data: notification.data,
            is_read: notification.is_read,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}

/// One page of the caller's notifications.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/notification-page-response.ts"
)]
pub struct NotificationPageResponse {
    pub items: Vec<NotificationResponse>,
    #[ts(type = "number")]
    pub total: u64,
    #[ts(type = "number")]
    pub unread: u64,
    pub limit: u32,
    pub offset: u32,
}

impl From<NotificationPage> for NotificationPageResponse {
    fn from(page: NotificationPage) -> Self {
        Self {
            items: page
                .items
                .into_iter()
                .map(NotificationResponse::from)
                .collect(),
            total: page.total,
            unread: page.unread,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

/// Result of marking every notification read.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/mark-all-read-response.ts"
)]
pub struct MarkAllReadResponse {
    #[ts(type = "number")]
    pub updated: u64,
}
