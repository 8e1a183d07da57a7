//! Live trade ticks handed over by the socket feed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single trade, already parsed from the Upbit `ticker` stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeTick {
    #[serde(rename = "code")]
    pub market: String,
    pub trade_price: Decimal,
    pub trade_volume: Decimal,
    /// Trade time in Unix milliseconds.
    #[serde(rename = "trade_timestamp")]
    pub timestamp: u64,
    #[serde(rename = "acc_trade_price_24h")]
    pub acc_trade_price: Decimal,
    #[serde(rename = "acc_trade_volume_24h")]
    pub acc_trade_volume: Decimal,
    #[serde(rename = "signed_change_rate")]
    pub change_rate: Decimal,
}
