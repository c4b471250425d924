//! # config — Config from Environment Variables
//!
//! | Variable           | Default                                     |
//! |--------------------|---------------------------------------------|
//! | `GEMINI_API_KEY`   | — (falls back to `API_KEY`; optional)       |
//! | `GEMINI_MODEL`     | `gemini-2.5-flash`                          |
//! | `GEMINI_BASE_URL`  | `https://generativelanguage.googleapis.com` |
//! | `CHAT_TEMPERATURE` | `0.3`                                       |
//! | `TICK_INTERVAL_MS` | `3000`                                      |
//! | `DEFAULT_SYMBOL`   | `BTC`                                       |
//! | `BIND_ADDR`        | `0.0.0.0:3000`                              |
//! | `SIM_SEED`         | — (thread RNG)                              |

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    /// Missing key does not stop startup; chat replies fall back instead.
    pub api_key:        Option<String>,
    pub model:          String,
    pub base_url:       String,
    pub temperature:    f32,
    /// How often the market context is regenerated.
    pub tick_interval:  Duration,
    /// Asset selected at startup.
    pub default_symbol: String,
    pub bind_addr:      SocketAddr,
    /// Fixed seed for a reproducible simulation.
    pub sim_seed:       Option<u64>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let temperature: f32 = std::env::var("CHAT_TEMPERATURE")
            .unwrap_or_else(|_| "0.3".to_string())
            .parse()
            .context("CHAT_TEMPERATURE must be a number")?;

        let tick_ms: u64 = std::env::var("TICK_INTERVAL_MS")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("TICK_INTERVAL_MS must be a number")?;

        if tick_ms == 0 {
            anyhow::bail!("TICK_INTERVAL_MS must be greater than zero");
        }

        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let sim_seed = match std::env::var("SIM_SEED") {
            Ok(v) => Some(v.parse().context("SIM_SEED must be an unsigned integer")?),
            Err(_) => None,
        };

        Ok(Self {
            api_key,
            model:          std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url:       std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            temperature,
            tick_interval:  Duration::from_millis(tick_ms),
            default_symbol: std::env::var("DEFAULT_SYMBOL").unwrap_or_else(|_| "BTC".to_string()),
            bind_addr,
            sim_seed,
        })
    }

    /// Config pointing the chat client at `base_url` (a mock server in tests).
    #[cfg(test)]
    pub fn for_tests(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            api_key:        api_key.map(str::to_string),
            model:          DEFAULT_MODEL.to_string(),
            base_url:       base_url.to_string(),
            temperature:    0.3,
            tick_interval:  Duration::from_millis(3000),
            default_symbol: "BTC".to_string(),
            bind_addr:      ([127, 0, 0, 1], 0).into(),
            sim_seed:       Some(17),
        }
    }
}
