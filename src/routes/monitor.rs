//! # routes::monitor
//!
//! | Method   | Path            | Description                         |
//! |----------|-----------------|-------------------------------------|
//! | GET (WS) | `/ws/dashboard` | Snapshot on connect, then WsEvents  |
//! | GET      | `/api/health`   | Liveness, selection, tick count     |

use std::sync::atomic::Ordering;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tracing::{debug, info};

use crate::state::SharedState;

// ─── WebSocket Handler ────────────────────────────────────────────────────────

pub async fn ws_dashboard(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    // Subscribe before the snapshot so nothing falls between the two.
    let mut rx = state.broadcast_tx.subscribe();
    let (mut sender, mut receiver) = socket.split();

    info!("🔌 Dashboard client connected");

    let snapshot = {
        let selection = state.current_selection().await;
        let context = state.current_context().await;
        let risk_level = context.as_ref().map(|c| c.risk_level());

        json!({
            "event":     "SNAPSHOT",
            "selection": selection,
            "context":   context.as_deref(),
            "riskLevel": risk_level,
            "history":   state.price_history().await,
            "messages":  state.messages().await,
        })
        .to_string()
    };

    if sender.send(Message::Text(snapshot.into())).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(json_str) => {
                        if sender.send(Message::Text(json_str.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!("WS client lagged, skipped {n} events");
                    }
                    Err(_) => break,
                }
            }

            result = receiver.next() => {
                match result {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sender.send(Message::Pong(data)).await;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("🔌 Dashboard client disconnected");
}

// ─── Health ───────────────────────────────────────────────────────────────────

/// GET /api/health
pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    let selection = state.current_selection().await;
    let has_context = state.current_context().await.is_some();
    let session = state.chat.session().await;

    Json(json!({
        "ok":          true,
        "service":     "sentinel",
        "selection":   selection,
        "hasContext":  has_context,
        "tickCount":   state.tick_count.load(Ordering::Relaxed),
        "chatEnabled": state.config.api_key.is_some(),
        "chatSession": session.map(|s| json!({
            "id":        s.id(),
            "startedAt": s.created_at(),
            "turns":     s.history().len(),
        })),
    }))
}
