use serde::{Deserialize, Serialize};

use crate::dto::NotificationResponse;

/// Frames accepted from clients.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub(super) enum ClientFrame {
    Subscribe,
}

/// Frames sent to clients.
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub(super) enum ServerFrame {
    Subscribed,
    New(NotificationResponse),
    Exception { message: String },
}

impl ServerFrame {
    pub(super) fn exception(message: impl Into<String>) -> Self {
        Self::Exception {
            message: message.into(),
        }
    }
}

pub(super) fn decode_client_frame(text: &str) -> Result<ClientFrame, serde_json::Error> {
    serde_json::from_str(text)
}

pub(super) fn encode_server_frame(frame: &ServerFrame) -> Result<String, serde_json::Error> {
    serde_json::to_string(frame)
}
