//! # engine::assembler
//!
//! [`MarketEngine`] owns the randomness source and the news pool and turns a
//! `(symbol, price)` pair into a complete [`MarketContext`].

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::MarketError;
use crate::models::asset::{default_asset, find_asset};
use crate::models::{MarketContext, PricePoint};

use super::news::{default_pool, NewsSampler};
use super::price::{next_price, seed_history};
use super::risk::score_risk;
use super::rng::{RandomSource, ThreadRandom};
use super::signals::generate_signals;

pub struct MarketEngine {
    sampler: NewsSampler,
    rng: Box<dyn RandomSource>,
}

impl MarketEngine {
    pub fn new(sampler: NewsSampler, rng: Box<dyn RandomSource>) -> Self {
        Self { sampler, rng }
    }

    /// Stock headlines, thread RNG.
    pub fn with_defaults() -> Result<Self, MarketError> {
        Ok(Self::new(
            NewsSampler::new(default_pool())?,
            Box::new(ThreadRandom),
        ))
    }

    /// Build the context for `symbol` at `price`.
    ///
    /// Unknown symbols fall back to the default asset; the returned context
    /// (headlines included) then carries the default asset's symbol.
    pub fn assemble_context(&mut self, symbol: &str, price: f64) -> MarketContext {
        self.assemble_context_at(symbol, price, Utc::now())
    }

    pub fn assemble_context_at(
        &mut self,
        symbol: &str,
        price: f64,
        now: DateTime<Utc>,
    ) -> MarketContext {
        let asset = match find_asset(symbol) {
            Some(asset) => asset,
            None => {
                let fallback = default_asset();
                warn!(symbol, fallback = %fallback.symbol, "Unknown asset — using default");
                fallback
            }
        };

        let signals = generate_signals(price, self.rng.as_mut());
        let news = self.sampler.sample(&asset.symbol, now, self.rng.as_mut());
        let risk_score = score_risk(&signals, &news);

        debug!(
            symbol = %asset.symbol,
            price,
            rsi = signals.rsi,
            risk_score,
            "Market context assembled"
        );

        MarketContext {
            asset: asset.with_price(price),
            signals,
            news,
            risk_score,
        }
    }

    pub fn next_price(&mut self, current: f64) -> f64 {
        next_price(current, self.rng.as_mut())
    }

    pub fn seed_history(&mut self, baseline: f64, now: DateTime<Utc>) -> Vec<PricePoint> {
        seed_history(baseline, now, self.rng.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::SeededRandom;

    fn engine() -> MarketEngine {
        MarketEngine::new(
            NewsSampler::new(default_pool()).unwrap(),
            Box::new(SeededRandom::new(2024)),
        )
    }

    #[test]
    fn test_context_matches_requested_asset() {
        let ctx = engine().assemble_context("SOL", 146.1);
        assert_eq!(ctx.symbol(), "SOL");
        assert_eq!(ctx.asset.name, "Solana");
        assert_eq!(ctx.asset.price, 146.1);
        assert_eq!(ctx.news.len(), 3);
        assert!(ctx.news.iter().all(|n| n.headline.starts_with("SOL: ")));
        assert!(ctx.risk_score <= 100);
    }

    #[test]
    fn test_unknown_symbol_falls_back_to_default() {
        let ctx = engine().assemble_context("DOGE", 0.12);
        assert_eq!(ctx.symbol(), default_asset().symbol);
        assert_eq!(ctx.asset.price, 0.12);
        assert!(ctx.news.iter().all(|n| n.headline.starts_with("BTC: ")));
    }

    #[test]
    fn test_risk_score_is_consistent_with_parts() {
        let mut engine = engine();
        for _ in 0..200 {
            let ctx = engine.assemble_context("ETH", 3450.75);
            assert_eq!(ctx.risk_score, score_risk(&ctx.signals, &ctx.news));
        }
    }

    #[test]
    fn test_same_seed_same_context() {
        let now = Utc::now();
        let a = engine().assemble_context_at("BTC", 64_000.0, now);
        let b = engine().assemble_context_at("BTC", 64_000.0, now);
        assert_eq!(a, b);
    }
}
