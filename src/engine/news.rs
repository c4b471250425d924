//! # engine::news
//!
//! Samples three distinct canned headlines per tick, decorates them with the
//! asset symbol and stamps them one hour apart, most recent first.

use chrono::{DateTime, Duration, Utc};

use crate::error::MarketError;
use crate::models::{NewsItem, Sentiment};

use super::rng::RandomSource;

/// Headlines attached to every context.
pub const NEWS_PER_CONTEXT: usize = 3;

const NEWS_SOURCE: &str = "CryptoWire";

/// A headline template without symbol or timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub text: String,
    pub sentiment: Sentiment,
}

impl Headline {
    pub fn new(text: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            text: text.into(),
            sentiment,
        }
    }
}

/// The stock headline pool.
pub fn default_pool() -> Vec<Headline> {
    use Sentiment::*;
    vec![
        Headline::new("SEC delays decision on ETF approval", Negative),
        Headline::new("Institutional inflow hits record high this quarter", Positive),
        Headline::new("Network congestion causes transaction fee spike", Negative),
        Headline::new("Major tech firm integrates payment solution", Positive),
        Headline::new("Market consolidates as traders await Fed minutes", Neutral),
        Headline::new("Whale wallet moves $500M to exchange", Negative),
        Headline::new("Developer activity surges on the protocol", Positive),
    ]
}

#[derive(Debug, Clone)]
pub struct NewsSampler {
    pool: Vec<Headline>,
}

impl NewsSampler {
    /// Validates the pool up front: sampling never fails afterwards.
    pub fn new(pool: Vec<Headline>) -> Result<Self, MarketError> {
        if pool.is_empty() {
            return Err(MarketError::EmptyNewsPool);
        }
        if pool.len() < NEWS_PER_CONTEXT {
            return Err(MarketError::NewsPoolTooSmall {
                have: pool.len(),
                need: NEWS_PER_CONTEXT,
            });
        }
        Ok(Self { pool })
    }

    /// Draw [`NEWS_PER_CONTEXT`] distinct headlines in random order.
    pub fn sample(
        &self,
        symbol: &str,
        now: DateTime<Utc>,
        rng: &mut dyn RandomSource,
    ) -> Vec<NewsItem> {
        // Partial Fisher-Yates over indices: the first k slots end up as a
        // uniform sample without replacement.
        let mut idx: Vec<usize> = (0..self.pool.len()).collect();
        for i in 0..NEWS_PER_CONTEXT {
            let j = i + rng.index(idx.len() - i);
            idx.swap(i, j);
        }

        idx.iter()
            .take(NEWS_PER_CONTEXT)
            .enumerate()
            .map(|(age_hours, &i)| {
                let template = &self.pool[i];
                NewsItem {
                    headline: format!("{symbol}: {}", template.text),
                    source: NEWS_SOURCE.to_string(),
                    sentiment: template.sentiment,
                    timestamp: now - Duration::hours(age_hours as i64),
                }
            })
            .collect()
    }
}
