//! Shared models for market reference data and candle series.
//!
//! Contains the records held by the store ([`candle::MarketRecord`]), the
//! Upbit REST payloads they are built from, and the parsed live trade ticks.

pub mod candle;
pub mod market;
pub mod trade;

use std::collections::HashMap;

pub use candle::{Candle, MarketRecord};
pub use trade::TradeTick;

/// Unique market identifier, e.g. `"KRW-BTC"`.
pub type MarketId = String;

/// Market catalog: market identifier to display name.
pub type MarketCatalog = HashMap<MarketId, String>;

/// Initial candle snapshot per market.
pub type InitialSeries = HashMap<MarketId, MarketRecord>;
