// WebSocket handler for the gesture streaming channel

use crate::http::AppState;
use crate::pipeline::{FrameError, PipelineStage};
use crate::protocol::{ErrorResponse, ServerMessage};
use crate::session::SessionManager;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Transport-level ceiling. Oversized frames below it get a protocol error
/// from the pipeline instead of a dropped connection.
const MIN_TRANSPORT_MESSAGE_BYTES: usize = 64 << 20;

/// WebSocket upgrade handler
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let limit = state
        .pipeline
        .max_frame_bytes()
        .saturating_mul(2)
        .max(MIN_TRANSPORT_MESSAGE_BYTES);

    ws.max_message_size(limit)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one streaming session until the client goes away
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let session_id = SessionManager::new_session_id();

    let guard = match state.sessions.register_guarded(session_id.clone()) {
        Ok(guard) => guard,
        Err(e) => {
            warn!("Rejecting WebSocket connection {}: {}", session_id, e);
            let rejection = ServerMessage::Error(ErrorResponse::new(e.to_string()));
            if let Ok(json) = rejection.to_json() {
                let _ = socket.send(Message::Text(json)).await;
            }
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
    };

    // Responses flow through a channel so the sender half can be owned by its own task
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let (mut sender, mut receiver) = socket.split();

    let send_id = session_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let json = match message.to_json() {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize response for {}: {}", send_id, e);
                    continue;
                }
            };

            if let Err(e) = sender.send(Message::Text(json)).await {
                warn!("Failed to send WebSocket message to {}: {}", send_id, e);
                break;
            }
        }
    });

    let recv_id = session_id.clone();
    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        // Messages that arrived while a frame was in flight, in arrival order
        let mut queued: VecDeque<Message> = VecDeque::new();

        loop {
            debug!("Session {} stage: {}", recv_id, PipelineStage::AwaitingFrame);

            let msg = match queued.pop_front() {
                Some(msg) => msg,
                None => match receiver.next().await {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        warn!("WebSocket error from {}: {}", recv_id, e);
                        break;
                    }
                    None => break,
                },
            };

            let reply = match msg {
                Message::Text(text) => {
                    recv_state.sessions.record_frame(&recv_id);

                    // Keep reading the socket so a disconnect abandons the frame at once
                    let work = recv_state.pipeline.handle_text(&text);
                    tokio::pin!(work);
                    let finished = loop {
                        tokio::select! {
                            reply = &mut work => break Some(reply),
                            incoming = receiver.next() => match incoming {
                                Some(Ok(Message::Close(_))) | None => break None,
                                Some(Err(e)) => {
                                    warn!("WebSocket error from {}: {}", recv_id, e);
                                    break None;
                                }
                                Some(Ok(next)) => queued.push_back(next),
                            },
                        }
                    };

                    match finished {
                        Some(reply) => reply,
                        None => {
                            debug!("Session {} disconnected mid-frame, abandoning it", recv_id);
                            break;
                        }
                    }
                }
                Message::Binary(_) => {
                    warn!("Received binary message from {}", recv_id);
                    ServerMessage::Error(FrameError::binary_frame().to_response())
                }
                Message::Close(_) => {
                    debug!("WebSocket connection {} closed by client", recv_id);
                    break;
                }
                Message::Ping(_) | Message::Pong(_) => continue,
            };

            if tx.send(reply).is_err() {
                break;
            }
        }
    });

    // Whichever half finishes first ends the session and abandons the other
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    debug!("Session {} stage: {}", guard.id(), PipelineStage::Terminated);
    drop(guard);
    info!("WebSocket connection closed: {}", session_id);
}
