//! # routes::market
//!
//! | Method | Path                  | Description                              |
//! |--------|-----------------------|------------------------------------------|
//! | GET    | `/api/market/assets`  | Asset registry                           |
//! | GET    | `/api/market/context` | Current context + risk level + readings  |
//! | GET    | `/api/market/history` | Price chart series                       |
//! | POST   | `/api/market/select`  | Switch asset (clears chat history)       |

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, models::asset::assets, state::SharedState};

#[derive(Deserialize)]
pub struct SelectBody {
    pub symbol: String,
}

/// GET /api/market/assets
pub async fn get_assets() -> impl IntoResponse {
    Json(json!({ "ok": true, "assets": assets() }))
}

/// GET /api/market/context — 404 while the first context is being assembled.
pub async fn get_context(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let context = state
        .current_context()
        .await
        .ok_or_else(|| AppError::NotFound("Market data is still loading".into()))?;

    Ok(Json(json!({
        "ok":        true,
        "context":   *context,
        "riskLevel": context.risk_level(),
        "readings":  context.signals.readings(),
    })))
}

/// GET /api/market/history
pub async fn get_history(State(state): State<SharedState>) -> impl IntoResponse {
    let selection = state.current_selection().await;
    let points = state.price_history().await;
    Json(json!({
        "ok":     true,
        "symbol": selection.symbol,
        "count":  points.len(),
        "points": points,
    }))
}

/// POST /api/market/select
pub async fn select_asset(
    State(state): State<SharedState>,
    Json(body): Json<SelectBody>,
) -> Result<impl IntoResponse, AppError> {
    let context = state.select_asset(&body.symbol).await?;
    let epoch = state.current_selection().await.epoch;

    Ok(Json(json!({
        "ok":      true,
        "epoch":   epoch,
        "context": *context,
        "message": format!("Now tracking {} — chat history cleared.", context.symbol()),
    })))
}
