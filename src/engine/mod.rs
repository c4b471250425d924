//! Market simulation: price walk, indicator snapshot, news, risk, and the
//! periodic ticker that drives them.

pub mod assembler;
pub mod news;
pub mod price;
pub mod risk;
pub mod rng;
pub mod signals;
pub mod ticker;

pub use assembler::MarketEngine;
