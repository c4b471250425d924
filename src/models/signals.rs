//! # models::signals
//!
//! [`TechnicalSignals`] — the indicator snapshot shown on the dashboard and
//! injected into every chat prompt. Regenerated wholesale on each tick; there
//! is no continuity between two snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Directional reading shared by MACD and the SMA crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStatus {
    Bullish,
    Bearish,
    Neutral,
    Volatile,
}

/// Where price sits relative to the Bollinger Bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BandPosition {
    Upper,
    Middle,
    Lower,
}

/// Whether the bands are widening or narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BandWidth {
    Expanding,
    Contracting,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    pub histogram: f64,
    pub signal: SignalStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub position: BandPosition,
    pub width: BandWidth,
}

/// One indicator snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSignals {
    /// Relative Strength Index, 0–100.
    pub rsi: u8,
    pub macd: Macd,
    pub bollinger_bands: BollingerBands,
    /// 50/200 simple-moving-average crossover.
    pub sma_crossover: SignalStatus,
    /// Stochastic oscillator, 0–100.
    pub stochastic: u8,
}

// ─── Display (wire names, used in prompts) ───────────────────────────────────

impl fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignalStatus::Bullish => "BULLISH",
            SignalStatus::Bearish => "BEARISH",
            SignalStatus::Neutral => "NEUTRAL",
            SignalStatus::Volatile => "VOLATILE",
        })
    }
}

impl fmt::Display for BandPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BandPosition::Upper => "UPPER",
            BandPosition::Middle => "MIDDLE",
            BandPosition::Lower => "LOWER",
        })
    }
}

impl fmt::Display for BandWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BandWidth::Expanding => "EXPANDING",
            BandWidth::Contracting => "CONTRACTING",
        })
    }
}

// ─── Readings ─────────────────────────────────────────────────────────────────

/// How the dashboard colours a single indicator card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

/// Human interpretation of one indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalReading {
    pub name: &'static str,
    pub value: String,
    pub tone: Tone,
    pub description: String,
}

impl TechnicalSignals {
    /// Card-by-card interpretation in dashboard order: RSI, MACD, SMA,
    /// Bollinger, Stochastic.
    pub fn readings(&self) -> Vec<SignalReading> {
        let (rsi_tone, rsi_desc) = if self.rsi > 70 {
            (Tone::Negative, "Overbought")
        } else if self.rsi < 30 {
            (Tone::Positive, "Oversold")
        } else {
            (Tone::Neutral, "Neutral Zone")
        };

        let macd_bull = self.macd.signal == SignalStatus::Bullish;
        let sma_bull = self.sma_crossover == SignalStatus::Bullish;

        let band_tone = match self.bollinger_bands.position {
            BandPosition::Upper => Tone::Negative,
            BandPosition::Lower => Tone::Positive,
            BandPosition::Middle => Tone::Neutral,
        };

        let stoch_tone = if self.stochastic > 80 {
            Tone::Negative
        } else if self.stochastic < 20 {
            Tone::Positive
        } else {
            Tone::Neutral
        };

        vec![
            SignalReading {
                name: "RSI (14)",
                value: self.rsi.to_string(),
                tone: rsi_tone,
                description: rsi_desc.to_string(),
            },
            SignalReading {
                name: "MACD",
                value: if macd_bull { "BULL" } else { "BEAR" }.to_string(),
                tone: if macd_bull { Tone::Positive } else { Tone::Negative },
                description: format!("Histogram: {}", self.macd.histogram),
            },
            SignalReading {
                name: "SMA 50/200",
                value: if sma_bull { "GOLDEN" } else { "DEATH" }.to_string(),
                tone: if sma_bull { Tone::Positive } else { Tone::Negative },
                description: if sma_bull { "Bullish Crossover" } else { "Bearish Cross" }
                    .to_string(),
            },
            SignalReading {
                name: "Bollinger",
                value: self.bollinger_bands.position.to_string(),
                tone: band_tone,
                description: format!("Volatility: {}", self.bollinger_bands.width),
            },
            SignalReading {
                name: "Stochastic",
                value: self.stochastic.to_string(),
                tone: stoch_tone,
                description: "Momentum Osc".to_string(),
            },
        ]
    }
}
