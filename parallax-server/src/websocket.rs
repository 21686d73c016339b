//! WebSocket delivery: persistent frame stream
//!
//! The client sends binary frames (encoded image bytes); the server replies
//! with one text message per frame, in receive order. A processing failure
//! is reported as an error text and the loop continues; only a disconnect
//! or close ends the connection, and it ends cleanly.

use crate::http::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tracing::{debug, error, info, warn};

/// WebSocket upgrade handler for `/ws`.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Per-connection loop: frames are processed one at a time, replies sent in
/// the order frames were received.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    info!("WebSocket connection established");

    while let Some(msg) = socket.recv().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                // Transport error doubles as the disconnect signal
                debug!("WebSocket transport closed: {}", e);
                break;
            }
        };

        match msg {
            Message::Binary(data) => {
                let reply = process_frame(&state, data).await;
                if socket.send(Message::Text(reply)).await.is_err() {
                    debug!("Client disconnected during send");
                    break;
                }
            }
            Message::Close(_) => {
                debug!("WebSocket closed by client");
                break;
            }
            Message::Text(_) => {
                warn!("Ignoring text message on binary frame stream");
            }
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    info!("WebSocket connection closed");
}

/// Run one frame through the shared processor off the async executor.
/// Failures never tear the connection down; they become an error text.
async fn process_frame(state: &AppState, data: Vec<u8>) -> String {
    let processor = state.processor.clone();
    let options = state.ws_options;

    match tokio::task::spawn_blocking(move || processor.process(&data, options)).await {
        Ok(Ok(result)) => result.to_text(),
        Ok(Err(e)) => {
            warn!("Frame processing failed: {}", e);
            format!("error: {}", e)
        }
        Err(e) => {
            error!("Frame processing task failed: {}", e);
            "error: internal processing failure".to_string()
        }
    }
}
