use std::sync::Arc;

use sqlx::PgPool;
use tasklane_infrastructure::{
    PostgresBoardMemberRepository, PostgresBoardRepository, PostgresNotificationRepository,
    PostgresUserRepository,
};

pub(super) struct RepositorySet {
    pub(super) board_repository: Arc<PostgresBoardRepository>,
    pub(super) board_member_repository: Arc<PostgresBoardMemberRepository>,
    pub(super) notification_repository: Arc<PostgresNotificationRepository>,
    pub(super) user_repository: Arc<PostgresUserRepository>,
}

pub(super) fn build_repository_set(pool: &PgPool) -> RepositorySet {
    RepositorySet {
        board_repository: Arc::new(PostgresBoardRepository::new(pool.clone())),
        board_member_repository: Arc::new(PostgresBoardMemberRepository::new(pool.clone())),
        notification_repository: Arc::new(PostgresNotificationRepository::new(pool.clone())),
        user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
    }
}
