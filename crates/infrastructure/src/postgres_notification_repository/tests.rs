use chrono::{Duration, Utc};
use serde_json::json;
use tasklane_application::NotificationRepository;
use tasklane_core::{BoardId, NotificationId, UserId};
use tasklane_domain::{Notification, NotificationType};

use super::PostgresNotificationRepository;
use crate::postgres_test_support::{seed_user, test_pool};

fn notification(user_id: UserId, notification_type: NotificationType, age_minutes: i64) -> Notification {
    Notification {
        id: NotificationId::new(),
        user_id,
        reference_id: Some(BoardId::new().as_uuid()),
        notification_type,
        message: notification_type.default_message().to_owned(),
        data: Some(json!({ "boardId": "b-1" })),
        is_read: false,
        created_at: Utc::now() - Duration::minutes(age_minutes),
    }
}

#[tokio::test]
async fn notifications_outlive_their_board_and_list_newest_first() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresNotificationRepository::new(pool.clone());
    let user_id = seed_user(&pool).await;
    let older = notification(user_id, NotificationType::ListCreated, 5);
    let newer = notification(user_id, NotificationType::BoardDeleted, 1);

    repository
        .insert_notifications(&[older.clone(), newer.clone()])
        .await
        .unwrap_or_else(|_| unreachable!());

    let listed = repository
        .list_for_user(user_id, 10, 0)
        .await
        .unwrap_or_else(|_| unreachable!());
    let ids: Vec<NotificationId> = listed.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
    assert_eq!(listed[0].data, newer.data);
    assert_eq!(
        repository
            .count_for_user(user_id)
            .await
            .unwrap_or_else(|_| unreachable!()),
        2
    );
}

#[tokio::test]
async fn read_flag_flips_once() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresNotificationRepository::new(pool.clone());
    let user_id = seed_user(&pool).await;
    let first = notification(user_id, NotificationType::TaskAssigned, 2);
    let second = notification(user_id, NotificationType::TaskMoved, 1);
    repository
        .insert_notifications(&[first.clone(), second])
        .await
        .unwrap_or_else(|_| unreachable!());

    let marked = repository
        .mark_read(first.id)
        .await
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());
    assert!(marked.is_read);

    let flipped = repository
        .mark_all_read(user_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(flipped, 1);
    assert_eq!(
        repository
            .count_unread_for_user(user_id)
            .await
            .unwrap_or_else(|_| unreachable!()),
        0
    );

    let missing = repository
        .mark_read(NotificationId::new())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(missing.is_none());
}
