//! Domain models shared across the whole Sentinel service.

pub mod asset;
pub mod chat;
pub mod context;
pub mod news;
pub mod signals;

pub use asset::Asset;
pub use chat::{ChatMessage, Role};
pub use context::{MarketContext, PricePoint, RiskLevel};
pub use news::{NewsItem, Sentiment};
pub use signals::{
    BandPosition, BandWidth, BollingerBands, Macd, SignalStatus, TechnicalSignals,
};
