//! # chat::session
//!
//! [`ChatSession`] — the conversation the adapter keeps with the model.
//! The REST API is stateless, so the session is just the system instruction
//! plus the turns exchanged so far; each request replays them.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::Role;

/// One side of an exchange as sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    id:                 Uuid,
    system_instruction: String,
    created_at:         DateTime<Utc>,
    history:            Vec<Turn>,
}

impl ChatSession {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            id:                 Uuid::new_v4(),
            system_instruction: system_instruction.into(),
            created_at:         Utc::now(),
            history:            Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Prior turns followed by `prompt` as the new user turn.
    pub fn turns_with(&self, prompt: &str) -> Vec<Turn> {
        let mut turns = self.history.clone();
        turns.push(Turn {
            role: Role::User,
            text: prompt.to_string(),
        });
        turns
    }

    /// Only completed exchanges are recorded.
    pub fn record_exchange(&mut self, prompt: String, reply: String) {
        self.history.push(Turn { role: Role::User, text: prompt });
        self.history.push(Turn { role: Role::Model, text: reply });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_with_appends_user_turn() {
        let mut session = ChatSession::new("persona");
        session.record_exchange("q1".into(), "a1".into());

        let turns = session.turns_with("q2");
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1].role, Role::Model);
        assert_eq!(turns[2], Turn { role: Role::User, text: "q2".into() });
        // building a request does not mutate history
        assert_eq!(session.history().len(), 2);
    }
}
