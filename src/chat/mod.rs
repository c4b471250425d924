//! # chat — Sentinel assistant
//!
//! [`ChatAdapter`] owns at most one [`ChatSession`] and is the only thing
//! that talks to the model.
//!
//! ## Lifecycle
//! ```text
//! send_message ──▶ no session? create one (persona, temperature 0.3)
//!              ──▶ build prompt from captured MarketContext + user text
//!              ──▶ POST history + prompt to Gemini
//!              ──▶ Ok  → record exchange, return text
//!                  Err → log, return FALLBACK_REPLY (session kept)
//! reset        ──▶ drop session; next message starts a fresh one
//! ```

pub mod gemini;
pub mod prompt;
pub mod session;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::models::MarketContext;

pub use gemini::GeminiClient;
pub use prompt::{build_prompt, FALLBACK_REPLY, SYSTEM_INSTRUCTION};
pub use session::ChatSession;

/// The session plus a counter bumped by every [`ChatAdapter::reset`].
#[derive(Default)]
struct SessionSlot {
    generation: u64,
    session:    Option<ChatSession>,
}

pub struct ChatAdapter {
    client: GeminiClient,
    /// Held for a whole turn so exchanges on the session stay in order.
    turn:   Mutex<()>,
    /// Held only briefly, never across the network call.
    slot:   Mutex<SessionSlot>,
}

impl ChatAdapter {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            turn: Mutex::new(()),
            slot: Mutex::new(SessionSlot::default()),
        }
    }

    /// Ask the model about `context`. Never fails: any error becomes
    /// [`FALLBACK_REPLY`].
    ///
    /// Turns run one at a time, each seeing the history of the ones before
    /// it. A [`reset`](Self::reset) does not wait for an in-flight turn; a
    /// turn that started before the reset is answered but not recorded.
    pub async fn send_message(&self, user_text: &str, context: &MarketContext) -> String {
        let generation = self.generation().await;
        self.send_message_in(generation, user_text, context).await
    }

    /// [`send_message`](Self::send_message) for a caller that captured
    /// `generation` earlier; the exchange is recorded only if no reset has
    /// happened since.
    pub async fn send_message_in(
        &self,
        generation: u64,
        user_text: &str,
        context: &MarketContext,
    ) -> String {
        let _turn = self.turn.lock().await;

        let prompt = build_prompt(context, user_text);

        let (session_id, instruction, turns) = {
            let mut slot = self.slot.lock().await;
            let session = slot.session.get_or_insert_with(|| {
                let session = ChatSession::new(SYSTEM_INSTRUCTION);
                info!(
                    session_id = %session.id(),
                    model      = %self.client.model(),
                    "💬 Chat session created"
                );
                session
            });
            (
                session.id(),
                session.system_instruction().to_string(),
                session.turns_with(&prompt),
            )
        };

        match self.client.generate(&instruction, &turns).await {
            Ok(reply) => {
                info!(
                    session_id = %session_id,
                    symbol     = %context.symbol(),
                    chars      = reply.len(),
                    "Chat reply received"
                );
                self.record(generation, prompt, reply.clone()).await;
                reply
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "❌ Gemini API error — sending fallback reply");
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn record(&self, generation: u64, prompt: String, reply: String) {
        let mut slot = self.slot.lock().await;
        if slot.generation != generation {
            warn!(generation, "Session reset mid-request — exchange not recorded");
            return;
        }
        if let Some(session) = slot.session.as_mut() {
            session.record_exchange(prompt, reply);
        }
    }

    pub async fn generation(&self) -> u64 {
        self.slot.lock().await.generation
    }

    /// Drop the current session, if any.
    pub async fn reset(&self) {
        let mut slot = self.slot.lock().await;
        slot.generation += 1;
        if let Some(old) = slot.session.take() {
            info!(session_id = %old.id(), turns = old.history().len(), "Chat session closed");
        }
    }

    /// Snapshot of the live session, mostly for diagnostics.
    pub async fn session(&self) -> Option<ChatSession> {
        self.slot.lock().await.session.clone()
    }
}
