//! # routes::chat
//!
//! | Method | Path                 | Description                        |
//! |--------|----------------------|------------------------------------|
//! | GET    | `/api/chat/messages` | Conversation for the current asset |
//! | POST   | `/api/chat/messages` | Ask Sentinel about the live market |

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, state::SharedState};

#[derive(Deserialize)]
pub struct SendBody {
    pub text: String,
}

/// GET /api/chat/messages
pub async fn get_messages(State(state): State<SharedState>) -> impl IntoResponse {
    let messages = state.messages().await;
    Json(json!({
        "ok":       true,
        "count":    messages.len(),
        "messages": messages,
    }))
}

/// POST /api/chat/messages — waits for the model. Service failures still
/// return 201 with the fallback reply as the model message.
pub async fn send_message(
    State(state): State<SharedState>,
    Json(body): Json<SendBody>,
) -> Result<impl IntoResponse, AppError> {
    let appended = state.send_chat(&body.text).await?;
    let discarded = appended.len() == 1;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "ok":             true,
            "messages":       appended,
            "replyDiscarded": discarded,
        })),
    ))
}
