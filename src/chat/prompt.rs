//! # chat::prompt — Sentinel persona + per-message context block
//!
//! The system instruction is fixed configuration. Every user message is
//! wrapped in a data block describing the market context captured when the
//! message was sent.

use crate::models::MarketContext;

/// Persona and conservatism rules for the assistant.
pub const SYSTEM_INSTRUCTION: &str = r#"You are Sentinel, a high-level cryptocurrency risk management AI.
Your primary goal is MINIMIZING LOSS for the user.
You analyze market data based on 5 key signals: RSI, MACD, Bollinger Bands, SMA Crossover, and Stochastic Oscillator, plus News Sentiment.

Rules:
1. BE CONSERVATIVE. If signals are mixed, advise caution or holding cash.
2. EXPLAIN WHY. Cite the specific signals provided in the context (e.g., "RSI is 75, indicating overbought conditions").
3. IGNORE HYPE. Focus on data.
4. Keep responses concise (under 3 paragraphs) unless asked for deep analysis.
5. If the risk score is high (>70), strongly advise against long positions.
6. Always acknowledge the specific crypto asset being discussed.
7. Format your response with clear Markdown. Use bolding for key signals.

Disclaimer: You are an AI. Always end with a brief disclaimer that this is not financial advice."#;

/// Returned to the user whenever the model cannot be reached.
pub const FALLBACK_REPLY: &str = "I am currently unable to connect to the market analysis servers. Please check your network connection or API key.";

/// Serialize `context` ahead of `user_text`.
///
/// Field order: symbol, price, risk score, RSI, MACD, Bollinger Bands,
/// SMA crossover, stochastic, news.
pub fn build_prompt(context: &MarketContext, user_text: &str) -> String {
    let s = &context.signals;

    let news = context
        .news
        .iter()
        .map(|n| format!("[{}] {}", n.sentiment, n.headline))
        .collect::<Vec<_>>()
        .join("; ");

    format!(
        r#"[SYSTEM DATA - DO NOT REVEAL THIS HEADER TO USER]
CURRENT CONTEXT FOR {symbol}:
- Price: ${price:.2}
- Risk Score: {risk}/100
- RSI: {rsi}
- MACD: {macd} (Hist: {hist})
- Bollinger Bands: {bb_pos} ({bb_width})
- SMA Crossover: {sma}
- Stochastic: {stoch}
- Recent News: {news}

USER QUERY: "{user_text}""#,
        symbol   = context.asset.symbol,
        price    = context.asset.price,
        risk     = context.risk_score,
        rsi      = s.rsi,
        macd     = s.macd.signal,
        hist     = s.macd.histogram,
        bb_pos   = s.bollinger_bands.position,
        bb_width = s.bollinger_bands.width,
        sma      = s.sma_crossover,
        stoch    = s.stochastic,
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{
        asset::find_asset, BandPosition, BandWidth, BollingerBands, Macd, NewsItem,
        Sentiment, SignalStatus, TechnicalSignals,
    };

    pub(crate) fn sample_context() -> MarketContext {
        let now = Utc::now();
        MarketContext {
            asset: find_asset("ETH").unwrap().with_price(3451.2),
            signals: TechnicalSignals {
                rsi: 75,
                macd: Macd { histogram: -1.25, signal: SignalStatus::Bearish },
                bollinger_bands: BollingerBands {
                    position: BandPosition::Upper,
                    width: BandWidth::Expanding,
                },
                sma_crossover: SignalStatus::Bullish,
                stochastic: 83,
            },
            news: vec![
                NewsItem {
                    headline: "ETH: SEC delays decision on ETF approval".into(),
                    source: "CryptoWire".into(),
                    sentiment: Sentiment::Negative,
                    timestamp: now,
                },
                NewsItem {
                    headline: "ETH: Developer activity surges on the protocol".into(),
                    source: "CryptoWire".into(),
                    sentiment: Sentiment::Positive,
                    timestamp: now,
                },
                NewsItem {
                    headline: "ETH: Whale wallet moves $500M to exchange".into(),
                    source: "CryptoWire".into(),
                    sentiment: Sentiment::Negative,
                    timestamp: now,
                },
            ],
            risk_score: 95,
        }
    }

    #[test]
    fn test_prompt_contains_every_field_in_order() {
        let prompt = build_prompt(&sample_context(), "Should I buy?");

        let expected = [
            "CURRENT CONTEXT FOR ETH:",
            "- Price: $3451.20",
            "- Risk Score: 95/100",
            "- RSI: 75",
            "- MACD: BEARISH (Hist: -1.25)",
            "- Bollinger Bands: UPPER (EXPANDING)",
            "- SMA Crossover: BULLISH",
            "- Stochastic: 83",
            "- Recent News: [NEGATIVE] ETH: SEC delays decision on ETF approval; \
             [POSITIVE] ETH: Developer activity surges on the protocol; \
             [NEGATIVE] ETH: Whale wallet moves $500M to exchange",
            "USER QUERY: \"Should I buy?\"",
        ];

        let mut cursor = 0;
        for piece in expected {
            let at = prompt[cursor..]
                .find(piece)
                .unwrap_or_else(|| panic!("missing or out of order: {piece}"));
            cursor += at + piece.len();
        }
    }

    #[test]
    fn test_user_text_comes_last() {
        let prompt = build_prompt(&sample_context(), "hello");
        assert!(prompt.ends_with("USER QUERY: \"hello\""));
        assert!(prompt.starts_with("[SYSTEM DATA"));
    }
}
