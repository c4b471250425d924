//! # events
//!
//! Defines [`WsEvent`] — every event the service pushes to dashboard clients
//! over `/ws/dashboard`.
//!
//! Events go through a `tokio::sync::broadcast::Sender<String>` as
//! pre-serialized JSON, which keeps the channel free of Clone constraints on
//! the payload types.

use serde::Serialize;

use crate::models::{ChatMessage, MarketContext, PricePoint, RiskLevel};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WsEvent {
    /// A tick replaced the market context.
    ContextUpdated {
        context:    Box<MarketContext>,
        risk_level: RiskLevel,
        point:      PricePoint,
    },

    /// The user switched assets; chat history was cleared.
    AssetSelected {
        symbol: String,
        epoch:  u64,
    },

    /// A user or model message joined the conversation.
    MessageAppended {
        message: ChatMessage,
    },

    /// A model reply arrived after the asset it was about had been replaced.
    ReplyDiscarded {
        symbol: String,
    },
}

impl WsEvent {
    /// Serialize for a WebSocket text frame.
    #[inline]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"event":"SERIALIZATION_ERROR"}"#.to_string())
    }
}
