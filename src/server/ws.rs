use crate::state::{AppState, Snapshot, WsMessage};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// The active estimate as a push message.
fn latest_estimate(snapshots: &watch::Receiver<Snapshot>) -> WsMessage {
    WsMessage::Estimate(Box::new(snapshots.borrow().clone()))
}

/// Next message for one client, or None once the engine side is gone.
///
/// Every estimate supersedes the previous one, so a client that falls
/// behind skips its backlog and resumes from the current snapshot.
async fn next_outbound(
    rx: &mut broadcast::Receiver<WsMessage>,
    snapshots: &watch::Receiver<Snapshot>,
) -> Option<WsMessage> {
    match rx.recv().await {
        Ok(msg) => Some(msg),
        Err(RecvError::Lagged(skipped)) => {
            tracing::debug!(skipped, "ws client lagged, resyncing to latest estimate");
            *rx = rx.resubscribe();
            Some(latest_estimate(snapshots))
        }
        Err(RecvError::Closed) => None,
    }
}

/// Serialize and push one message. Err means the client is gone.
async fn push(sink: &mut SplitSink<WebSocket, Message>, msg: &WsMessage) -> Result<(), ()> {
    let Ok(json) = serde_json::to_string(msg) else {
        tracing::warn!("ws message failed to serialize");
        return Ok(());
    };
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sink, mut stream) = socket.split();
    let mut rx = state.ws_tx.subscribe();
    let snapshots = state.snapshot_rx.clone();

    // New clients render the current estimate before any update arrives
    if push(&mut sink, &latest_estimate(&snapshots)).await.is_err() {
        return;
    }

    let send_task = tokio::spawn(async move {
        while let Some(msg) = next_outbound(&mut rx, &snapshots).await {
            if push(&mut sink, &msg).await.is_err() {
                break;
            }
        }
    });

    // Clients only listen; inbound frames matter for disconnect only
    let recv_task = tokio::spawn(async move {
        while let Some(frame) = stream.next().await {
            if matches!(frame, Ok(Message::Close(_)) | Err(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }
}
