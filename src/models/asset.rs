//! # models::asset
//!
//! Defines [`Asset`] and the static registry of assets the dashboard offers.

use serde::{Deserialize, Serialize};

/// A tradeable crypto asset as the dashboard shows it.
///
/// `symbol` is the identity and never changes; `price` is overwritten by the
/// simulator on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Short ticker code, e.g. `"BTC"`.
    pub symbol: String,
    /// Display name, e.g. `"Bitcoin"`.
    pub name: String,
    /// Last simulated price in USD.
    pub price: f64,
    /// Reference 24h change in percent (signed).
    pub change24h: f64,
}

impl Asset {
    fn reference(symbol: &str, name: &str, price: f64, change24h: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            change24h,
        }
    }

    /// Same asset, different price.
    pub fn with_price(&self, price: f64) -> Self {
        Self {
            price,
            ..self.clone()
        }
    }
}

// ─── Registry ─────────────────────────────────────────────────────────────────

/// All assets known to the service, in display order. The first entry is the
/// fallback for unknown symbols.
pub fn assets() -> Vec<Asset> {
    vec![
        Asset::reference("BTC", "Bitcoin", 64230.50, 1.2),
        Asset::reference("ETH", "Ethereum", 3450.75, -0.5),
        Asset::reference("SOL", "Solana", 145.20, 3.4),
    ]
}

/// Case-insensitive lookup by symbol.
pub fn find_asset(symbol: &str) -> Option<Asset> {
    assets()
        .into_iter()
        .find(|a| a.symbol.eq_ignore_ascii_case(symbol.trim()))
}

/// The asset used whenever a symbol is not in the registry.
pub fn default_asset() -> Asset {
    Asset::reference("BTC", "Bitcoin", 64230.50, 1.2)
}
