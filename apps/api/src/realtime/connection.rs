use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use futures_util::{Sink, SinkExt, StreamExt};
use serde::Deserialize;
use tasklane_core::{AppError, AppResult, UserIdentity};
use tracing::{debug, info, warn};

use super::protocol::{ClientFrame, ServerFrame, decode_client_frame, encode_server_frame};
use crate::dto::NotificationResponse;
use crate::middleware::bearer_token;
use crate::state::AppState;

/// Server pings every interval; a connection that misses one pong is dropped.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Default, Deserialize)]
pub struct HubQuery {
    token: Option<String>,
}

pub async fn notifications_hub_handler(
    State(state): State<AppState>,
    Query(query): Query<HubQuery>,
    headers: HeaderMap,
    upgrade: WebSocketUpgrade,
) -> Response {
    let token = bearer_token(&headers)
        .map(ToOwned::to_owned)
        .or(query.token);

    upgrade.on_upgrade(move |socket| serve_connection(socket, state, token))
}

async fn serve_connection(socket: WebSocket, state: AppState, token: Option<String>) {
    let (mut sender, mut receiver) = socket.split();

    let identity = match authenticate(&state, token.as_deref()).await {
        Ok(identity) => identity,
        Err(error) => {
            debug!(error = %error, "rejecting notification hub connection");
            if let Err(send_error) = reject_connection(&mut sender, error.to_string()).await {
                debug!(error = %send_error, "failed to deliver hub rejection");
            }
            return;
        }
    };

    let user_id = identity.user_id();
    let (connection_id, mut notifications) = state.realtime_hub.register(user_id).await;
    info!(%user_id, %connection_id, "notification hub connected");

    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.tick().await;
    let mut awaiting_pong = false;

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                let Some(Ok(message)) = incoming else {
                    break;
                };

                match message {
                    Message::Text(text) => {
                        let reply = match decode_client_frame(text.as_str()) {
                            Ok(ClientFrame::Subscribe) => {
                                state.realtime_hub.subscribe(connection_id).await;
                                ServerFrame::Subscribed
                            }
                            Err(error) => {
                                warn!(%user_id, error = %error, "unsupported hub frame");
                                ServerFrame::exception(format!("unsupported frame: {error}"))
                            }
                        };
                        if send_frame(&mut sender, &reply).await.is_err() {
                            break;
                        }
                    }
                    Message::Pong(_) => awaiting_pong = false,
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            pushed = notifications.recv() => {
                let Some(notification) = pushed else {
                    break;
                };

                let frame = ServerFrame::New(NotificationResponse::from(notification));
                if send_frame(&mut sender, &frame).await.is_err() {
                    break;
                }
            }
            _ = heartbeat.tick() => {
                if awaiting_pong {
                    warn!(%user_id, %connection_id, "heartbeat timeout, dropping hub connection");
                    break;
                }
                awaiting_pong = true;
                if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    state.realtime_hub.unregister(connection_id).await;
    info!(%user_id, %connection_id, "notification hub disconnected");
}

async fn authenticate(state: &AppState, token: Option<&str>) -> AppResult<UserIdentity> {
    let token = token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing access token".to_owned()))?;

    state.user_service.authenticate(token).await
}

async fn send_frame<S>(sender: &mut S, frame: &ServerFrame) -> Result<(), S::Error>
where
    S: Sink<Message> + Unpin,
{
    match encode_server_frame(frame) {
        Ok(text) => sender.send(Message::Text(text.into())).await,
        Err(error) => {
            warn!(error = %error, "failed to encode hub frame");
            Ok(())
        }
    }
}

/// Sends an exception frame followed by a close frame.
async fn reject_connection<S>(sender: &mut S, message: String) -> Result<(), S::Error>
where
    S: Sink<Message> + Unpin,
{
    send_frame(sender, &ServerFrame::exception(message)).await?;
    sender.send(Message::Close(None)).await
}

#[cfg(test)]
mod tests {
    use axum::extract::ws::Message;
    use serde_json::{Value, json};

    use super::reject_connection;

    #[tokio::test]
    async fn rejection_sends_exception_then_close() {
        let mut sent: Vec<Message> = Vec::new();

        reject_connection(&mut sent, "missing access token".to_owned())
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(sent.len(), 2);
        match &sent[0] {
            Message::Text(text) => {
                let frame: Value =
                    serde_json::from_str(text.as_str()).unwrap_or_else(|_| unreachable!());
                assert_eq!(
                    frame,
                    json!({ "event": "exception", "data": { "message": "missing access token" } })
                );
            }
            other => panic!("expected text frame, got {other:?}"),
        }
        assert!(matches!(sent[1], Message::Close(None)));
    }
}
