//! # models::context
//!
//! Defines [`MarketContext`] — the immutable snapshot produced once per tick.
//!
//! The whole value is swapped on every tick (see `state`), so a reader holds
//! either the previous snapshot or the new one, never a mix of both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Asset, NewsItem, TechnicalSignals};

/// Everything the dashboard and the chat assistant know about one asset at
/// one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketContext {
    pub asset: Asset,
    pub signals: TechnicalSignals,
    /// Exactly three items, most recent first.
    pub news: Vec<NewsItem>,
    /// 0 (calm) to 100 (extreme risk).
    pub risk_score: u8,
}

impl MarketContext {
    pub fn symbol(&self) -> &str {
        &self.asset.symbol
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }
}

/// Display band for a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    ExtremeCaution,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        if score > 70 {
            RiskLevel::ExtremeCaution
        } else if score < 30 {
            RiskLevel::Low
        } else {
            RiskLevel::Moderate
        }
    }
}

/// One point of the price chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub time: DateTime<Utc>,
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_bands() {
        assert_eq!(RiskLevel::from_score(95), RiskLevel::ExtremeCaution);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(29), RiskLevel::Low);
    }
}
