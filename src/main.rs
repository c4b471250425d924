//! # Sentinel — Crypto Market Context & Risk Assistant
//!
//! ## Architecture Overview
//!
//! ```text
//!  ┌──────────────┐  every 3s   ┌──────────────────────────────┐
//!  │ Ticker task  │ ──────────▶ │ AppState                     │
//!  │ (per asset)  │  next price │ ├─ context  Arc<MarketCtx>   │
//!  └──────────────┘  + signals  │ ├─ price_history             │
//!                    + news     │ ├─ messages                  │
//!                    + risk     │ ├─ chat ── ChatSession ──────┼──▶ Gemini API
//!                               │ └─ broadcast_tx ───────────┐ │
//!                               └────────────────────────────┼─┘
//!  ┌──────────────┐  ws://host/ws/dashboard  ◀───────────────┘
//!  │  Dashboard   │  GET  /api/market/*   POST /api/market/select
//!  └──────────────┘  GET  /api/chat/messages  POST /api/chat/messages
//! ```
//!
//! ## Environment Variables
//!
//! See [`config`]. `RUST_LOG` works as usual; `sentinel=debug` is always added.

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod chat;
mod config;
mod engine;
mod error;
mod events;
mod models;
mod routes;
mod state;

use config::Config;
use routes::build_router;
use state::build_state;

// ─── Entry Point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("sentinel=debug".parse()?)
                .add_directive("tower_http=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    info!(r#"

  ╔═══════════════════════════════════════════════╗
  ║        SENTINEL — Crypto Risk Assistant       ║
  ║   Signals · News · Risk Score · AI Chat       ║
  ╚═══════════════════════════════════════════════╝"#);

    // ── 3. Config ─────────────────────────────────────────────────────────────
    let config = Config::from_env().context("Failed to load config")?;

    if config.api_key.is_none() {
        warn!("GEMINI_API_KEY not set — chat replies will fall back until it is configured");
    }

    info!(
        model    = %config.model,
        interval = ?config.tick_interval,
        symbol   = %config.default_symbol,
        "Config loaded"
    );

    // ── 4. Shared state + first context ───────────────────────────────────────
    let addr = config.bind_addr;
    let default_symbol = config.default_symbol.clone();
    let state = build_state(config).context("Failed to build application state")?;

    state
        .select_asset(&default_symbol)
        .await
        .with_context(|| format!("DEFAULT_SYMBOL '{default_symbol}' is not a known asset"))?;

    // ── 5. Router ─────────────────────────────────────────────────────────────
    let app = build_router(state.clone());

    // ── 6. Bind & Serve ───────────────────────────────────────────────────────
    info!(?addr, "🚀 Sentinel server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown().await;
    info!("👋 Sentinel stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
