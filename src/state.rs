//! # state
//!
//! `AppState` — the presentation boundary shared by the ticker, the chat
//! handlers and every WebSocket client.
//!
//! ## Design
//!
//! * The current [`MarketContext`] is an `Arc` swapped whole on every tick,
//!   so readers get the previous or the next snapshot, never a partial one.
//! * Each asset selection gets a new **epoch**. The ticker and in-flight chat
//!   requests remember the epoch they started under and drop their result if
//!   it is no longer current.
//! * The chat session is reset under the same selection lock that bumps the
//!   epoch, so a chat turn under the new epoch never sees the old session.
//! * Lock order is `selection → context → price_history → messages → chat`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::chat::{ChatAdapter, GeminiClient};
use crate::config::Config;
use crate::engine::news::{default_pool, NewsSampler};
use crate::engine::price::HISTORY_CAPACITY;
use crate::engine::rng::SeededRandom;
use crate::engine::ticker::spawn_ticker;
use crate::engine::MarketEngine;
use crate::error::AppError;
use crate::events::WsEvent;
use crate::models::asset::find_asset;
use crate::models::{ChatMessage, MarketContext, PricePoint};

/// The asset the dashboard is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub symbol: String,
    /// Bumped on every selection; 0 means nothing selected yet.
    pub epoch:  u64,
}

// ─── AppState ─────────────────────────────────────────────────────────────────

pub struct AppState {
    pub config: Arc<Config>,

    // ── Market ────────────────────────────────────────────────────────────────
    /// `None` until the first selection has assembled a context ("loading").
    pub context:       RwLock<Option<Arc<MarketContext>>>,
    /// Chart series for the selected asset, oldest first.
    pub price_history: RwLock<VecDeque<PricePoint>>,
    pub selection:     RwLock<Selection>,
    pub engine:        Mutex<MarketEngine>,

    // ── Chat ──────────────────────────────────────────────────────────────────
    /// Conversation for the selected asset, append-only until the next switch.
    pub messages: RwLock<Vec<ChatMessage>>,
    pub chat:     ChatAdapter,

    // ── Monitor / WebSocket ───────────────────────────────────────────────────
    pub broadcast_tx: broadcast::Sender<String>,
    pub tick_count:   AtomicU64,

    /// Refresh task of the current selection. Held for the whole of
    /// `select_asset`, which serializes selections.
    ticker: Mutex<Option<JoinHandle<()>>>,
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: Config, engine: MarketEngine, chat: ChatAdapter) -> Self {
        let (broadcast_tx, _) = broadcast::channel(256);
        let selection = Selection {
            symbol: config.default_symbol.clone(),
            epoch:  0,
        };

        Self {
            config:        Arc::new(config),
            context:       RwLock::new(None),
            price_history: RwLock::new(VecDeque::with_capacity(HISTORY_CAPACITY + 1)),
            selection:     RwLock::new(selection),
            engine:        Mutex::new(engine),
            messages:      RwLock::new(Vec::new()),
            chat,
            broadcast_tx,
            tick_count:    AtomicU64::new(0),
            ticker:        Mutex::new(None),
        }
    }

    // ── Helper Methods ────────────────────────────────────────────────────────

    /// Broadcast to every WebSocket client. No listeners is not an error.
    pub fn broadcast(&self, event: &WsEvent) {
        let _ = self.broadcast_tx.send(event.to_json());
    }

    pub async fn current_context(&self) -> Option<Arc<MarketContext>> {
        self.context.read().await.clone()
    }

    pub async fn current_selection(&self) -> Selection {
        self.selection.read().await.clone()
    }

    pub async fn price_history(&self) -> Vec<PricePoint> {
        self.price_history.read().await.iter().copied().collect()
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    /// **Select asset** — stop the old refresh task, clear the conversation,
    /// assemble a fresh context at the asset's reference price and start a new
    /// refresh task for it.
    pub async fn select_asset(self: &Arc<Self>, symbol: &str) -> Result<Arc<MarketContext>, AppError> {
        let asset = find_asset(symbol)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown asset symbol: '{symbol}'")))?;

        let mut ticker = self.ticker.lock().await;
        if let Some(handle) = ticker.take() {
            handle.abort();
        }

        let now = Utc::now();
        let (context, seed) = {
            let mut engine = self.engine.lock().await;
            (
                engine.assemble_context_at(&asset.symbol, asset.price, now),
                engine.seed_history(asset.price, now),
            )
        };
        let context = Arc::new(context);

        let epoch = {
            let mut selection = self.selection.write().await;
            selection.epoch += 1;
            selection.symbol = asset.symbol.clone();

            *self.context.write().await = Some(Arc::clone(&context));

            let mut history = self.price_history.write().await;
            history.clear();
            history.extend(seed);
            history.push_back(PricePoint { time: now, price: asset.price });

            self.messages.write().await.clear();
            self.chat.reset().await;
            selection.epoch
        };

        info!(
            symbol     = %asset.symbol,
            epoch,
            price      = asset.price,
            risk_score = context.risk_score,
            "📊 Asset selected — chat history cleared"
        );
        self.broadcast(&WsEvent::AssetSelected {
            symbol: asset.symbol.clone(),
            epoch,
        });

        *ticker = Some(spawn_ticker(Arc::clone(self), epoch, self.config.tick_interval));

        Ok(context)
    }

    /// One refresh for `epoch`: walk the price, rebuild the context, swap it
    /// in. Returns `false` once `epoch` has been superseded.
    pub async fn tick(&self, epoch: u64) -> bool {
        let Some(current) = self.current_context().await else {
            return false;
        };

        let now = Utc::now();
        let next = {
            let mut engine = self.engine.lock().await;
            let price = engine.next_price(current.asset.price);
            Arc::new(engine.assemble_context(current.symbol(), price))
        };
        let point = PricePoint { time: now, price: next.asset.price };

        {
            let selection = self.selection.read().await;
            if selection.epoch != epoch {
                return false;
            }

            *self.context.write().await = Some(Arc::clone(&next));

            let mut history = self.price_history.write().await;
            history.push_back(point);
            while history.len() > HISTORY_CAPACITY {
                history.pop_front();
            }
        }

        let ticks = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            symbol     = %next.symbol(),
            price      = next.asset.price,
            risk_score = next.risk_score,
            ticks,
            "Tick"
        );

        self.broadcast(&WsEvent::ContextUpdated {
            context:    Box::new((*next).clone()),
            risk_level: next.risk_level(),
            point,
        });
        true
    }

    /// **Send chat text** — append the user message, ask the assistant about
    /// the context captured right now, append the reply.
    ///
    /// A reply that arrives after an asset switch is dropped: the list it
    /// belonged to has been cleared. Returns the messages actually appended.
    pub async fn send_chat(&self, text: &str) -> Result<Vec<ChatMessage>, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest("Message text must not be empty".into()));
        }

        let user_msg = ChatMessage::user(text);

        let (epoch, generation, context) = {
            let selection = self.selection.read().await;
            let context = self
                .current_context()
                .await
                .ok_or_else(|| AppError::NotFound("Market data is still loading".into()))?;
            self.messages.write().await.push(user_msg.clone());
            (selection.epoch, self.chat.generation().await, context)
        };
        self.broadcast(&WsEvent::MessageAppended { message: user_msg.clone() });

        let reply = self.chat.send_message_in(generation, text, &context).await;

        let model_msg = {
            let selection = self.selection.read().await;
            if selection.epoch != epoch {
                warn!(
                    asked_about = %context.symbol(),
                    now_on      = %selection.symbol,
                    "Late chat reply discarded after asset switch"
                );
                drop(selection);
                self.broadcast(&WsEvent::ReplyDiscarded {
                    symbol: context.symbol().to_string(),
                });
                return Ok(vec![user_msg]);
            }
            let msg = ChatMessage::model(reply);
            self.messages.write().await.push(msg.clone());
            msg
        };
        self.broadcast(&WsEvent::MessageAppended { message: model_msg.clone() });

        Ok(vec![user_msg, model_msg])
    }

    /// Stop background refresh (server shutdown).
    pub async fn shutdown(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
            info!("Market ticker stopped");
        }
    }
}

/// Production wiring: stock headline pool, Gemini over reqwest, thread RNG
/// unless `SIM_SEED` asks for a reproducible run.
pub fn build_state(config: Config) -> anyhow::Result<SharedState> {
    let engine = match config.sim_seed {
        Some(seed) => {
            info!(seed, "Seeded market simulation");
            MarketEngine::new(NewsSampler::new(default_pool())?, Box::new(SeededRandom::new(seed)))
        }
        None => MarketEngine::with_defaults()?,
    };
    let chat = ChatAdapter::new(GeminiClient::new(reqwest::Client::new(), &config));
    Ok(Arc::new(AppState::new(config, engine, chat)))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::chat::FALLBACK_REPLY;
    use crate::models::Role;

    pub(crate) fn test_state(config: Config) -> SharedState {
        let engine = MarketEngine::new(
            NewsSampler::new(default_pool()).unwrap(),
            Box::new(SeededRandom::new(17)),
        );
        let chat = ChatAdapter::new(GeminiClient::new(reqwest::Client::new(), &config));
        Arc::new(AppState::new(config, engine, chat))
    }

    fn offline_state() -> SharedState {
        test_state(Config::for_tests("http://127.0.0.1:9", None))
    }

    fn reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
    }

    #[tokio::test]
    async fn test_loading_until_first_selection() {
        let state = offline_state();
        assert!(state.current_context().await.is_none());
        let err = state.send_chat("hi").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_select_sets_context_history_and_epoch() {
        let state = offline_state();
        let ctx = state.select_asset("eth").await.unwrap();

        assert_eq!(ctx.symbol(), "ETH");
        assert_eq!(ctx.asset.price, 3450.75);
        assert_eq!(state.current_context().await.unwrap().symbol(), "ETH");
        assert_eq!(state.current_selection().await, Selection { symbol: "ETH".into(), epoch: 1 });

        let history = state.price_history().await;
        assert_eq!(history.len(), 21);
        assert_eq!(history.last().unwrap().price, 3450.75);
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_switch_clears_messages_and_changes_symbol() {
        let state = offline_state();
        state.select_asset("BTC").await.unwrap();
        state.send_chat("is it safe?").await.unwrap();
        assert_eq!(state.messages().await.len(), 2);

        let ctx = state.select_asset("SOL").await.unwrap();
        assert_eq!(ctx.symbol(), "SOL");
        assert!(state.messages().await.is_empty());
        assert_eq!(state.current_selection().await.epoch, 2);
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_symbol_rejected_and_state_untouched() {
        let state = offline_state();
        state.select_asset("BTC").await.unwrap();
        let err = state.select_asset("DOGE").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(state.current_selection().await.symbol, "BTC");
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_tick_replaces_context_and_caps_history() {
        let state = offline_state();
        state.select_asset("BTC").await.unwrap();
        let epoch = state.current_selection().await.epoch;

        for _ in 0..40 {
            assert!(state.tick(epoch).await);
        }

        assert_eq!(state.tick_count.load(Ordering::Relaxed), 40);
        assert_eq!(state.price_history().await.len(), HISTORY_CAPACITY);
        let ctx = state.current_context().await.unwrap();
        assert_eq!(ctx.symbol(), "BTC");
        assert_eq!(ctx.news.len(), 3);
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_stale_epoch_tick_is_ignored() {
        let state = offline_state();
        state.select_asset("BTC").await.unwrap();
        state.select_asset("ETH").await.unwrap();
        let before = state.current_context().await.unwrap();

        assert!(!state.tick(1).await);
        let after = state.current_context().await.unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_ticker_refreshes_in_background() {
        let mut config = Config::for_tests("http://127.0.0.1:9", None);
        config.tick_interval = Duration::from_millis(10);
        let state = test_state(config);

        state.select_asset("SOL").await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(state.tick_count.load(Ordering::Relaxed) > 0);

        state.shutdown().await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        let stopped_at = state.tick_count.load(Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(state.tick_count.load(Ordering::Relaxed), stopped_at);
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let state = offline_state();
        state.select_asset("BTC").await.unwrap();
        let err = state.send_chat("   ").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(state.messages().await.is_empty());
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_chat_failure_appends_fallback() {
        let state = offline_state();
        state.select_asset("BTC").await.unwrap();

        let appended = state.send_chat("  should I sell?  ").await.unwrap();
        assert_eq!(appended.len(), 2);
        assert_eq!(appended[0].role, Role::User);
        assert_eq!(appended[0].text, "should I sell?");
        assert_eq!(appended[1].role, Role::Model);
        assert_eq!(appended[1].text, FALLBACK_REPLY);
        assert_eq!(state.messages().await, appended);
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_late_reply_after_switch_is_discarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply("BTC looks overbought.").set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;

        let state = test_state(Config::for_tests(&server.uri(), Some("k")));
        state.select_asset("BTC").await.unwrap();

        let pending = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { state.send_chat("thoughts?").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        state.select_asset("ETH").await.unwrap();

        let appended = pending.await.unwrap().unwrap();
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].role, Role::User);
        assert!(state.messages().await.is_empty());
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_successful_reply_appended() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply("**RSI** is elevated. Not financial advice."))
            .mount(&server)
            .await;

        let state = test_state(Config::for_tests(&server.uri(), Some("k")));
        state.select_asset("SOL").await.unwrap();

        let appended = state.send_chat("risk?").await.unwrap();
        assert_eq!(appended[1].text, "**RSI** is elevated. Not financial advice.");
        assert_eq!(state.messages().await.len(), 2);
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_switch_drops_chat_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply("Risk is moderate."))
            .mount(&server)
            .await;

        let state = test_state(Config::for_tests(&server.uri(), Some("k")));
        state.select_asset("BTC").await.unwrap();
        state.send_chat("risk?").await.unwrap();
        let btc_session = state.chat.session().await.expect("session after first reply");
        assert_eq!(btc_session.history().len(), 2);

        state.select_asset("ETH").await.unwrap();
        assert!(state.chat.session().await.is_none());

        state.send_chat("and now?").await.unwrap();
        let eth_session = state.chat.session().await.unwrap();
        assert_ne!(eth_session.id(), btc_session.id());
        assert_eq!(eth_session.history().len(), 2);
        assert!(eth_session.history()[0].text.contains("CURRENT CONTEXT FOR ETH"));
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_late_reply_not_recorded_into_next_assets_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply("BTC answer").set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;

        let state = test_state(Config::for_tests(&server.uri(), Some("k")));
        state.select_asset("BTC").await.unwrap();

        let pending = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { state.send_chat("thoughts?").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        state.select_asset("ETH").await.unwrap();

        pending.await.unwrap().unwrap();
        assert!(state.chat.session().await.is_none());
        state.shutdown().await;
    }
}
