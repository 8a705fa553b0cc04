mod auth;
mod boards;
mod common;
mod members;
mod notifications;
mod tasks;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use boards::{BoardAccessResponse, BoardResponse, CreateBoardRequest, UpdateBoardRequest};
pub use common::{HealthResponse, MemberIdsRequest, MemberIdsResponse, UserResponse};
pub use members::{
    BoardMemberResponse, UpdateMemberPermissionsRequest, UpdateMemberRolesRequest,
};
pub use notifications::{
    MarkAllReadResponse, NotificationListQuery, NotificationPageResponse, NotificationResponse,
};
pub use tasks::{
    CreateListRequest, CreateTaskRequest, ListResponse, MoveTaskRequest, RenameListRequest,
    TaskResponse, UpdateTaskRequest, UpdateTaskStatusRequest,
};

#[cfg(test)]
mod tests;
