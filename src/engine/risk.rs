//! # engine::risk
//!
//! Risk score: start at 50, add the penalties below, clamp to `[0, 100]`.
//!
//! | Condition                 | Adjustment |
//! |---------------------------|------------|
//! | RSI > 70 (overbought)     | +15        |
//! | RSI < 30 (oversold)       | −10        |
//! | MACD signal BEARISH       | +10        |
//! | each NEGATIVE news item   | +10        |

use crate::models::{NewsItem, Sentiment, SignalStatus, TechnicalSignals};

const BASE_RISK: i32 = 50;

pub fn score_risk(signals: &TechnicalSignals, news: &[NewsItem]) -> u8 {
    let mut risk = BASE_RISK;

    if signals.rsi > 70 {
        risk += 15;
    }
    if signals.rsi < 30 {
        risk -= 10;
    }

    if signals.macd.signal == SignalStatus::Bearish {
        risk += 10;
    }

    let negative = news
        .iter()
        .filter(|n| n.sentiment == Sentiment::Negative)
        .count() as i32;
    risk = risk.saturating_add(negative.saturating_mul(10));

    risk.clamp(0, 100) as u8
}
