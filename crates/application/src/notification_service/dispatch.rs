use serde_json::Value;
use tasklane_core::{BoardId, TaskId, UserId};
use tasklane_domain::{NotificationDraft, NotificationType};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{BoardAudience, NotificationService};

/// Unit of background notification work.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationJob {
    /// Explicitly addressed drafts.
    Direct(Vec<NotificationDraft>),
    /// Board-scoped fan-out resolved when the job runs.
    Board {
        /// Board whose audience is notified.
        board_id: BoardId,
        /// Audience selector.
        audience: BoardAudience,
        /// Users left out of the audience, usually the actor.
        excluded_user_ids: Vec<UserId>,
        /// Event kind.
        notification_type: NotificationType,
        /// Structured payload shared by every recipient.
        data: Option<Value>,
    },
    /// Task assignee fan-out resolved when the job runs.
    TaskAssignees {
        /// Board owning the task.
        board_id: BoardId,
        /// Task whose assignees are notified.
        task_id: TaskId,
        /// User left out of the audience, usually the actor.
        exclude_user_id: UserId,
        /// Event kind.
        notification_type: NotificationType,
        /// Structured payload shared by every recipient.
        data: Option<Value>,
    },
}

impl NotificationJob {
    /// Returns a short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Direct(_) => "direct",
            Self::Board {
                audience: BoardAudience::Members,
                ..
            } => "board_members",
            Self::Board {
                audience: BoardAudience::OwnerAndManagers,
                ..
            } => "board_owner_and_managers",
            Self::TaskAssignees { .. } => "task_assignees",
        }
    }
}

/// Fire-and-forget handle that enqueues notification jobs.
///
/// Enqueueing never blocks and never fails the caller. Jobs are processed in
/// submission order by a single worker.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::UnboundedSender<NotificationJob>,
}

/// Receiving side of the notification queue.
pub struct NotificationJobReceiver {
    receiver: mpsc::UnboundedReceiver<NotificationJob>,
}

impl NotificationJobReceiver {
    /// Waits for the next job. Returns `None` once every dispatcher is dropped.
    pub async fn recv(&mut self) -> Option<NotificationJob> {
        self.receiver.recv().await
    }

    /// Returns the next queued job without waiting.
    pub fn try_recv(&mut self) -> Option<NotificationJob> {
        self.receiver.try_recv().ok()
    }
}

impl NotificationDispatcher {
    /// Creates a dispatcher and the receiver its jobs arrive on.
    #[must_use]
    pub fn channel() -> (Self, NotificationJobReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, NotificationJobReceiver { receiver })
    }

    /// Creates a dispatcher backed by a spawned worker.
    ///
    /// Must be called inside a Tokio runtime.
    #[must_use]
    pub fn spawn(service: NotificationService) -> (Self, JoinHandle<()>) {
        let (dispatcher, receiver) = Self::channel();
        let handle = tokio::spawn(run_notification_worker(receiver, service));
        (dispatcher, handle)
    }

    /// Queues explicitly addressed drafts.
    pub fn create_and_send(&self, drafts: Vec<NotificationDraft>) {
        if drafts.is_empty() {
            return;
        }
        self.enqueue(NotificationJob::Direct(drafts));
    }

    /// Queues a notification for the owner and every member except `exclude_user_id`.
    pub fn notify_board_members(
        &self,
        board_id: BoardId,
        exclude_user_id: UserId,
        notification_type: NotificationType,
        data: Option<Value>,
    ) {
        self.enqueue(NotificationJob::Board {
            board_id,
            audience: BoardAudience::Members,
            excluded_user_ids: vec![exclude_user_id],
            notification_type,
            data,
        });
    }

    /// Queues a notification for the owner and managers except `exclude_user_id`.
    pub fn notify_board_owner_and_managers(
        &self,
        board_id: BoardId,
        exclude_user_id: UserId,
        notification_type: NotificationType,
        data: Option<Value>,
    ) {
        self.notify_board_owner_and_managers_except(
            board_id,
            vec![exclude_user_id],
            notification_type,
            data,
        );
    }

    /// Queues a notification for the owner and managers minus every excluded user.
    pub fn notify_board_owner_and_managers_except(
        &self,
        board_id: BoardId,
        excluded_user_ids: Vec<UserId>,
        notification_type: NotificationType,
        data: Option<Value>,
    ) {
        self.enqueue(NotificationJob::Board {
            board_id,
            audience: BoardAudience::OwnerAndManagers,
            excluded_user_ids,
            notification_type,
            data,
        });
    }

    /// Queues a notification for task assignees except `exclude_user_id`.
    pub fn notify_task_assignees(
        &self,
        board_id: BoardId,
        task_id: TaskId,
        exclude_user_id: UserId,
        notification_type: NotificationType,
        data: Option<Value>,
    ) {
        self.enqueue(NotificationJob::TaskAssignees {
            board_id,
            task_id,
            exclude_user_id,
            notification_type,
            data,
        });
    }

    fn enqueue(&self, job: NotificationJob) {
        let kind = job.kind();
        if self.sender.send(job).is_err() {
            warn!(job = kind, "notification worker stopped; dropping job");
        }
    }
}

/// Drains the queue until every dispatcher is dropped.
///
/// Failures are logged per job and never stop the loop.
pub async fn run_notification_worker(
    mut receiver: NotificationJobReceiver,
    service: NotificationService,
) {
    info!("notification worker started");

    while let Some(job) = receiver.recv().await {
        let kind = job.kind();
        match service.deliver(job).await {
            Ok(notifications) => {
                debug!(job = kind, count = notifications.len(), "notification job delivered");
            }
            Err(error) => error!(error = %error, job = kind, "notification job failed"),
        }
    }

    info!("notification worker stopped");
}
