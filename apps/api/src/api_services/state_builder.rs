use std::sync::Arc;

use sqlx::PgPool;
use tasklane_application::{
    BoardAccessService, BoardMemberService, BoardService, NotificationDispatcher,
    NotificationService,
};
use tasklane_core::AppError;
use tasklane_infrastructure::InMemoryRealtimeHub;
use tokio::task::JoinHandle;

use crate::api_config::ApiConfig;
use crate::state::AppState;

mod repositories;
mod users;

/// Wires repositories and services, and starts the notification worker.
///
/// The returned handle finishes once every dispatcher clone held by the
/// state has been dropped.
pub fn build_app_state(
    pool: PgPool,
    config: &ApiConfig,
) -> Result<(AppState, JoinHandle<()>), AppError> {
    let repositories = repositories::build_repository_set(&pool);
    let realtime_hub = InMemoryRealtimeHub::new();

    let notification_service = NotificationService::new(
        repositories.notification_repository,
        repositories.board_member_repository.clone(),
        Arc::new(realtime_hub.clone()),
    );
    let (dispatcher, notification_worker) =
        NotificationDispatcher::spawn(notification_service.clone());

    let board_access_service =
        BoardAccessService::new(repositories.board_member_repository.clone());
    let board_service = BoardService::new(
        board_access_service.clone(),
        repositories.board_repository.clone(),
        repositories.board_repository,
        repositories.board_member_repository.clone(),
        dispatcher.clone(),
    );
    let board_member_service = BoardMemberService::new(
        board_access_service.clone(),
        repositories.board_member_repository,
        dispatcher,
    );
    let user_service = users::build_user_service(config, repositories.user_repository)?;

    Ok((
        AppState {
            user_service,
            board_service,
            board_member_service,
            board_access_service,
            notification_service,
            realtime_hub,
        },
        notification_worker,
    ))
}
