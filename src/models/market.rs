//! Upbit REST payloads for the market catalog, daily candles, and tickers.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::{Candle, MarketRecord};
use crate::{CoinboardError, Result};

/// One entry of `GET /market/all`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketInfo {
    /// Market code, e.g. `"KRW-BTC"`.
    pub market: String,
    pub korean_name: String,
    pub english_name: String,
}

/// One entry of `GET /candles/days`.
#[derive(Debug, Clone, Deserialize)]
pub struct DayCandleResponse {
    pub market: String,
    /// Start of the candle window, e.g. `"2024-01-02T00:00:00"`.
    pub candle_date_time_utc: String,
    pub opening_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub trade_price: Decimal,
    /// Timestamp of the last trade inside this candle.
    pub timestamp: u64,
    pub candle_acc_trade_price: Decimal,
    pub candle_acc_trade_volume: Decimal,
}

impl DayCandleResponse {
    /// Converts the wire payload into a store candle.
    ///
    /// # Errors
    ///
    /// Returns [`CoinboardError::Transport`] if the window start is not a
    /// valid `YYYY-MM-DDTHH:MM:SS` timestamp.
    pub fn to_candle(&self) -> Result<Candle> {
        Ok(Candle {
            timestamp: parse_utc_millis(&self.candle_date_time_utc)?,
            open: self.opening_price,
            high: self.high_price,
            low: self.low_price,
            close: self.trade_price,
            volume: self.candle_acc_trade_volume,
        })
    }
}

/// One entry of `GET /ticker`.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerResponse {
    pub market: String,
    pub trade_price: Decimal,
    /// Signed change versus the previous day's close, as a fraction.
    pub signed_change_rate: Decimal,
    pub acc_trade_price_24h: Decimal,
    pub acc_trade_volume_24h: Decimal,
    /// Time of the last trade, in Unix milliseconds.
    pub trade_timestamp: u64,
    pub timestamp: u64,
}

impl TickerResponse {
    /// Builds a market record from this ticker and the market's candles.
    pub fn into_record(self, candles: Vec<Candle>) -> MarketRecord {
        let mut record = MarketRecord {
            candles,
            acc_trade_price: self.acc_trade_price_24h,
            acc_trade_volume: self.acc_trade_volume_24h,
            change_rate: self.signed_change_rate,
            last_trade_timestamp: self.trade_timestamp,
        };
        record.normalize_candles();
        record
    }
}

/// Error body returned by Upbit on non-success responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub name: String,
    pub message: String,
}

/// Parses `YYYY-MM-DDTHH:MM:SS` (UTC) into Unix milliseconds.
///
/// # Errors
///
/// Returns [`CoinboardError::Transport`] on any malformed component.
pub fn parse_utc_millis(value: &str) -> Result<u64> {
    let malformed = || CoinboardError::Transport(format!("malformed candle time: {value:?}"));

    let (date, time) = value.split_once('T').ok_or_else(malformed)?;
    let mut date_parts = date.splitn(3, '-');
    let mut time_parts = time.splitn(3, ':');

    let (year, month, day) = (
        next_field(&mut date_parts).ok_or_else(malformed)?,
        next_field(&mut date_parts).ok_or_else(malformed)?,
        next_field(&mut date_parts).ok_or_else(malformed)?,
    );
    let (hour, minute, second) = (
        next_field(&mut time_parts).ok_or_else(malformed)?,
        next_field(&mut time_parts).ok_or_else(malformed)?,
        next_field(&mut time_parts).ok_or_else(malformed)?,
    );

    if !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
        || !(0..24).contains(&hour)
        || !(0..60).contains(&minute)
        || !(0..60).contains(&second)
    {
        return Err(malformed());
    }

    let seconds = days_from_civil(year, month, day) * 86_400 + hour * 3_600 + minute * 60 + second;
    u64::try_from(seconds * 1_000).map_err(|_| malformed())
}

fn next_field<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Option<i64> {
    parts.next()?.parse().ok()
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}
