//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod database_error;
mod in_memory_realtime_hub;
mod jwt_access_token_codec;
mod postgres_board_member_repository;
mod postgres_board_repository;
mod postgres_notification_repository;
#[cfg(test)]
mod postgres_test_support;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_realtime_hub::{ConnectionId, InMemoryRealtimeHub, NotificationReceiver};
pub use jwt_access_token_codec::{JwtAccessTokenCodec, MIN_JWT_SECRET_LENGTH};
pub use postgres_board_member_repository::PostgresBoardMemberRepository;
pub use postgres_board_repository::PostgresBoardRepository;
pub use postgres_notification_repository::PostgresNotificationRepository;
pub use postgres_user_repository::PostgresUserRepository;
