//! Process-local registry of live notification connections.
//!
//! Each WebSocket connection registers once and receives frames only after it
//! subscribes to its user channel. Users without a subscribed connection are
//! skipped; nothing is buffered for them.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tasklane_application::NotificationPublisher;
use tasklane_core::{AppResult, UserId};
use tasklane_domain::Notification;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

/// Identifier of one live connection.
pub type ConnectionId = Uuid;

/// Receiving half handed to a connection task.
pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

struct Connection {
    user_id: UserId,
    subscribed: bool,
    sender: mpsc::UnboundedSender<Notification>,
}

/// Connection registry implementing the notification publisher port.
#[derive(Clone, Default)]
pub struct InMemoryRealtimeHub {
    connections: Arc<RwLock<HashMap<ConnectionId, Connection>>>,
}

impl InMemoryRealtimeHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an authenticated connection. Returns its id and frame receiver.
    pub async fn register(&self, user_id: UserId) -> (ConnectionId, NotificationReceiver) {
        let connection_id = Uuid::new_v4();
        let (sender, receiver) = mpsc::unbounded_channel();

        self.connections.write().await.insert(
            connection_id,
            Connection {
                user_id,
                subscribed: false,
                sender,
            },
        );
        tracing::debug!(%connection_id, user_id = %user_id, "realtime connection registered");

        (connection_id, receiver)
    }

    /// Joins the connection to its user channel.
    ///
    /// Returns `false` when the connection is no longer registered.
    pub async fn subscribe(&self, connection_id: ConnectionId) -> bool {
        match self.connections.write().await.get_mut(&connection_id) {
            Some(connection) => {
                connection.subscribed = true;
                true
            }
            None => false,
        }
    }

    /// Drops a connection from the registry.
    pub async fn unregister(&self, connection_id: ConnectionId) {
        if let Some(connection) = self.connections.write().await.remove(&connection_id) {
            tracing::debug!(
                %connection_id,
                user_id = %connection.user_id,
                "realtime connection unregistered"
            );
        }
    }

    /// Counts subscribed connections of one user.
    pub async fn subscriber_count(&self, user_id: UserId) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|connection| connection.subscribed && connection.user_id == user_id)
            .count()
    }
}

#[async_trait]
impl NotificationPublisher for InMemoryRealtimeHub {
    async fn publish(&self, notifications: &[Notification]) -> AppResult<usize> {
        let mut delivered = 0;
        let mut closed = Vec::new();

        {
            let connections = self.connections.read().await;
            for notification in notifications {
                for (connection_id, connection) in connections.iter() {
                    if !connection.subscribed || connection.user_id != notification.user_id {
                        continue;
                    }

                    if connection.sender.send(notification.clone()).is_ok() {
                        delivered += 1;
                    } else {
                        closed.push(*connection_id);
                    }
                }
            }
        }

        if !closed.is_empty() {
            let mut connections = self.connections.write().await;
            for connection_id in closed {
                connections.remove(&connection_id);
            }
        }

        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tasklane_application::NotificationPublisher;
    use tasklane_core::{NotificationId, UserId};
    use tasklane_domain::{Notification, NotificationType};

    use super::InMemoryRealtimeHub;

    fn notification_for(user_id: UserId) -> Notification {
        Notification {
            id: NotificationId::new(),
            user_id,
            reference_id: None,
            notification_type: NotificationType::TaskMoved,
            message: NotificationType::TaskMoved.default_message().to_owned(),
            data: None,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn only_subscribed_connections_receive_frames() {
        let hub = InMemoryRealtimeHub::new();
        let user_id = UserId::new();
        let (pending_id, mut pending) = hub.register(user_id).await;
        let (joined_id, mut joined) = hub.register(user_id).await;
        assert!(hub.subscribe(joined_id).await);

        let delivered = hub
            .publish(&[notification_for(user_id)])
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(delivered, 1);
        assert!(joined.try_recv().is_ok());
        assert!(pending.try_recv().is_err());
        assert_ne!(pending_id, joined_id);
    }

    #[tokio::test]
    async fn frames_are_scoped_to_the_recipient() {
        let hub = InMemoryRealtimeHub::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let (alice_connection, mut alice_rx) = hub.register(alice).await;
        let (bob_connection, mut bob_rx) = hub.register(bob).await;
        hub.subscribe(alice_connection).await;
        hub.subscribe(bob_connection).await;

        let notification = notification_for(bob);
        hub.publish(std::slice::from_ref(&notification))
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(alice_rx.try_recv().is_err());
        assert_eq!(bob_rx.try_recv().ok(), Some(notification));
    }

    #[tokio::test]
    async fn offline_users_are_skipped() {
        let hub = InMemoryRealtimeHub::new();

        let delivered = hub
            .publish(&[notification_for(UserId::new())])
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn unregistered_and_dropped_connections_leave_the_registry() {
        let hub = InMemoryRealtimeHub::new();
        let user_id = UserId::new();
        let (kept, _kept_rx) = hub.register(user_id).await;
        let (dropped, dropped_rx) = hub.register(user_id).await;
        hub.subscribe(kept).await;
        hub.subscribe(dropped).await;
        assert_eq!(hub.subscriber_count(user_id).await, 2);

        drop(dropped_rx);
        let delivered = hub
            .publish(&[notification_for(user_id)])
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(delivered, 1);
        assert_eq!(hub.subscriber_count(user_id).await, 1);

        hub.unregister(kept).await;
        assert_eq!(hub.subscriber_count(user_id).await, 0);
        assert!(!hub.subscribe(kept).await);
    }
}
