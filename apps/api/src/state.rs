use tasklane_application::{
    BoardAccessService, BoardMemberService, BoardService, NotificationService, UserService,
};
use tasklane_infrastructure::InMemoryRealtimeHub;

/// Shared API state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub board_service: BoardService,
    pub board_member_service: BoardMemberService,
    pub board_access_service: BoardAccessService,
    pub notification_service: NotificationService,
    pub realtime_hub: InMemoryRealtimeHub,
}
