//! OHLCV candles and the per-market record kept in the candle slice.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TradeTick;

/// Length of one daily candle in milliseconds.
pub const CANDLE_INTERVAL_MS: u64 = 86_400_000;

/// A single OHLCV candlestick bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Start of this candle's time window, in Unix milliseconds (UTC).
    pub timestamp: u64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl Candle {
    /// Opens a new candle from a single trade.
    pub fn from_trade(timestamp: u64, price: Decimal, volume: Decimal) -> Self {
        Self {
            timestamp,
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        }
    }
}

/// Accumulated trading state and candle history of one market.
///
/// The four fields always describe the same point in time: the last
/// successfully merged snapshot or trade tick for this market.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRecord {
    /// Chronological, oldest first.
    pub candles: Vec<Candle>,
    pub acc_trade_price: Decimal,
    pub acc_trade_volume: Decimal,
    pub change_rate: Decimal,
    /// Time of the newest trade folded into this record, in Unix
    /// milliseconds. Zero until the first snapshot or tick.
    #[serde(default)]
    pub last_trade_timestamp: u64,
}

impl MarketRecord {
    /// Sorts candles oldest first and drops duplicate windows, keeping the
    /// last occurrence of each start time.
    pub fn normalize_candles(&mut self) {
        self.candles.reverse();
        self.candles.sort_by_key(|c| c.timestamp);
        self.candles.dedup_by_key(|c| c.timestamp);
    }

    /// Folds a live trade into this record.
    ///
    /// Returns `false` and leaves the record untouched when the trade is
    /// older than the newest trade already applied or than the current
    /// candle window.
    pub fn apply_trade(&mut self, tick: &TradeTick) -> bool {
        if tick.timestamp < self.last_trade_timestamp {
            return false;
        }
        let window_start = tick.timestamp - tick.timestamp % CANDLE_INTERVAL_MS;

        match self.candles.last_mut() {
            Some(last) if tick.timestamp < last.timestamp => return false,
            Some(last) if window_start <= last.timestamp => {
                last.high = last.high.max(tick.trade_price);
                last.low = last.low.min(tick.trade_price);
                last.close = tick.trade_price;
                last.volume += tick.trade_volume;
            }
            _ => self.candles.push(Candle::from_trade(
                window_start,
                tick.trade_price,
                tick.trade_volume,
            )),
        }

        self.acc_trade_price = tick.acc_trade_price;
        self.acc_trade_volume = tick.acc_trade_volume;
        self.change_rate = tick.change_rate;
        self.last_trade_timestamp = tick.timestamp;
        true
    }
}
