use tasklane_core::{AppError, BoardId, UserId};
use tasklane_domain::{BoardPermission, BoardRole};

use crate::test_support::{Harness, identity};

#[tokio::test]
async fn owner_resolves_with_every_permission_without_a_row() {
    let harness = Harness::new();
    let owner_id = UserId::new();
    let board = harness.store.seed_board(owner_id).await;

    let access = harness
        .access
        .resolve(board.id, owner_id)
        .await
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());

    assert!(access.is_owner);
    assert!(access.membership.is_none());
    assert_eq!(access.permissions.len(), BoardPermission::all().len());
    assert!(access.roles().contains(&BoardRole::Owner));
}

#[tokio::test]
async fn member_resolves_with_materialized_permissions() {
    let harness = Harness::new();
    let board = harness.store.seed_board(UserId::new()).await;
    let member = harness.store.seed_member(board.id, BoardRole::Member).await;

    let access = harness
        .access
        .resolve(board.id, member.member_id())
        .await
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());

    assert!(!access.is_owner);
    assert_eq!(&access.permissions, member.permissions());
    assert_eq!(access.rank(), 1);
}

#[tokio::test]
async fn outsider_resolves_to_none() {
    let harness = Harness::new();
    let board = harness.store.seed_board(UserId::new()).await;

    let access = harness.access.resolve(board.id, UserId::new()).await;
    assert!(matches!(access, Ok(None)));
}

#[tokio::test]
async fn missing_board_is_not_found() {
    let harness = Harness::new();

    let result = harness.access.resolve(BoardId::new(), UserId::new()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn guard_rejects_outsider() {
    let harness = Harness::new();
    let board = harness.store.seed_board(UserId::new()).await;

    let result = harness
        .access
        .require_board_membership(&identity(UserId::new()), board.id)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn guard_allows_member_with_empty_requirement() {
    let harness = Harness::new();
    let board = harness.store.seed_board(UserId::new()).await;
    let viewer = harness.store.seed_member(board.id, BoardRole::Viewer).await;

    let result = harness
        .access
        .require_board_permissions(&identity(viewer.member_id()), board.id, &[])
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn guard_names_every_missing_permission() {
    let harness = Harness::new();
    let board = harness.store.seed_board(UserId::new()).await;
    let member = harness.store.seed_member(board.id, BoardRole::Member).await;

    let result = harness
        .access
        .require_board_permissions(
            &identity(member.member_id()),
            board.id,
            &[
                BoardPermission::TaskMove,
                BoardPermission::BoardMembersDelete,
                BoardPermission::ListCreate,
            ],
        )
        .await;

    match result {
        Err(AppError::Forbidden(message)) => {
            assert!(message.contains("BOARD_MEMBERS_DELETE"));
            assert!(message.contains("LIST_CREATE"));
            assert!(!message.contains("TASK_MOVE"));
        }
        other => panic!("expected forbidden error, got {other:?}"),
    }
}

#[tokio::test]
async fn guard_allows_owner_for_owner_only_permissions() {
    let harness = Harness::new();
    let owner_id = UserId::new();
    let board = harness.store.seed_board(owner_id).await;

    let result = harness
        .access
        .require_board_permissions(
            &identity(owner_id),
            board.id,
            &[
                BoardPermission::BoardDelete,
                BoardPermission::BoardMembersRoleUpdate,
            ],
        )
        .await;
    assert!(result.is_ok());
}
