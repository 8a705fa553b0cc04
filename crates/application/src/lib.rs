//! Application services and ports.

#![forbid(unsafe_code)]

mod board_access_service;
mod board_member_service;
mod board_ports;
mod board_service;
mod notification_ports;
mod notification_service;
mod user_service;

#[cfg(test)]
mod test_support;

pub use board_access_service::{BoardAccess, BoardAccessService, OWNER_RANK};
pub use board_member_service::BoardMemberService;
pub use board_ports::{
    BoardMemberRepository, BoardRepository, BoardStanding, CreateTaskInput, TaskRepository,
    UpdateTaskInput,
};
pub use board_service::{BoardService, CreateBoardInput, UpdateBoardInput};
pub use notification_ports::{NotificationPublisher, NotificationRepository};
pub use notification_service::{
    BoardAudience, MAX_NOTIFICATION_PAGE_SIZE, NotificationDispatcher, NotificationJob,
    NotificationJobReceiver, NotificationPage, NotificationService, run_notification_worker,
};
pub use user_service::{
    AccessTokenCodec, AuthSession, IssuedToken, NewUser, PasswordHasher, RegisterParams,
    UserRecord, UserRepository, UserService,
};
