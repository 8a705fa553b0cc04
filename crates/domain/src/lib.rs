//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod board;
mod notification;
mod permission;
mod role;
mod user;

pub use board::{Board, BoardList, BoardMember, Task, TaskStatus};
pub use notification::{Notification, NotificationDraft, NotificationType};
pub use permission::BoardPermission;
pub use role::{BoardRole, highest_rank, permissions_for_role, permissions_for_roles};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, USERNAME_MAX_LENGTH,
    USERNAME_MIN_LENGTH, Username, validate_password,
};
