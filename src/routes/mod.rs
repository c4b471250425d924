//! HTTP + WebSocket surface of the dashboard.

pub mod chat;
pub mod market;
pub mod monitor;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    // Dashboard dev server runs on another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Market ────────────────────────────────────────────────────────────
        .route("/api/market/assets",  get(market::get_assets))
        .route("/api/market/context", get(market::get_context))
        .route("/api/market/history", get(market::get_history))
        .route("/api/market/select",  post(market::select_asset))
        // ── Chat ──────────────────────────────────────────────────────────────
        .route("/api/chat/messages",  get(chat::get_messages).post(chat::send_message))
        // ── Monitor ───────────────────────────────────────────────────────────
        .route("/ws/dashboard",       get(monitor::ws_dashboard))
        .route("/api/health",         get(monitor::health_check))
        // ── Middleware ────────────────────────────────────────────────────────
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
