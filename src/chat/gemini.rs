//! # chat::gemini — Google Gemini `generateContent` client
//!
//! Thin reqwest wrapper: one POST per message, the whole session history in
//! the body, concatenated text parts of the first candidate back.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::ChatError;
use crate::models::Role;

use super::session::Turn;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Instruction<'a>,
    contents:           Vec<Content<'a>>,
    generation_config:  GenerationConfig,
}

#[derive(Serialize)]
struct Instruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role:  Role,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

// ─── Client ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http:        reqwest::Client,
    base_url:    String,
    api_key:     Option<String>,
    model:       String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url:    config.base_url.trim_end_matches('/').to_string(),
            api_key:     config.api_key.clone(),
            model:       config.model.clone(),
            temperature: config.temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(
        &self,
        system_instruction: &str,
        turns: &[Turn],
    ) -> Result<String, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::MissingApiKey)?;

        let body = GenerateRequest {
            system_instruction: Instruction {
                parts: vec![Part { text: system_instruction }],
            },
            contents: turns
                .iter()
                .map(|t| Content {
                    role:  t.role,
                    parts: vec![Part { text: &t.text }],
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        debug!(model = %self.model, turns = turns.len(), "Calling Gemini API...");

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ChatError::Api { status, body });
        }

        let raw = resp.text().await?;
        let data: GenerateResponse = serde_json::from_str(&raw)?;

        let text: String = data
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ChatError::EmptyResponse);
        }

        Ok(text)
    }
}
