//! WebSocket gateway that pushes newly created notifications to their recipients.
//!
//! A client connects to `/hub/notifications` with a bearer token (header or
//! `?token=` query), sends `{"event":"subscribe"}` and from then on receives
//! `{"event":"new","data":<notification>}` frames.

mod connection;
mod protocol;

pub use connection::notifications_hub_handler;
