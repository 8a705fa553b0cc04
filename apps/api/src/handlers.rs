pub mod auth;
pub mod boards;
pub mod health;
pub mod members;
pub mod notifications;
