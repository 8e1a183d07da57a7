//! Deserialization tests for the Upbit REST and stream payloads.

use rust_decimal_macros::dec;

use coinboard::models::market::{ApiErrorResponse, DayCandleResponse, MarketInfo, TickerResponse};
use coinboard::models::{MarketCatalog, TradeTick};

const MARKET_ALL_JSON: &str = include_str!("fixtures/market_all.json");
const CANDLES_DAYS_JSON: &str = include_str!("fixtures/candles_days.json");
const TICKER_JSON: &str = include_str!("fixtures/ticker.json");
const TRADE_TICK_JSON: &str = include_str!("fixtures/trade_tick.json");
const API_ERROR_JSON: &str = include_str!("fixtures/api_error.json");

const JAN_2: u64 = 1_704_153_600_000;
const JAN_3: u64 = 1_704_240_000_000;

#[test]
fn test_market_all_deserializes() {
    let markets: Vec<MarketInfo> =
        serde_json::from_str(MARKET_ALL_JSON).expect("Failed to deserialize market list");

    assert_eq!(markets.len(), 3);
    assert_eq!(markets[0].market, "KRW-BTC");
    assert_eq!(markets[0].korean_name, "비트코인");
    assert_eq!(markets[0].english_name, "Bitcoin");
    assert_eq!(markets[2].market, "BTC-ETH");
}

#[test]
fn test_market_all_collects_into_catalog() {
    let markets: Vec<MarketInfo> =
        serde_json::from_str(MARKET_ALL_JSON).expect("Failed to deserialize market list");

    let catalog: MarketCatalog = markets
        .into_iter()
        .map(|info| (info.market, info.korean_name))
        .collect();

    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog["KRW-ETH"], "이더리움");
    assert_eq!(catalog["BTC-ETH"], "이더리움");
}

#[test]
fn test_day_candles_deserialize() {
    let candles: Vec<DayCandleResponse> =
        serde_json::from_str(CANDLES_DAYS_JSON).expect("Failed to deserialize day candles");

    assert_eq!(candles.len(), 2);
    let latest = &candles[0];
    assert_eq!(latest.market, "KRW-BTC");
    assert_eq!(latest.candle_date_time_utc, "2024-01-03T00:00:00");
    assert_eq!(latest.opening_price, dec!(61000000));
    assert_eq!(latest.high_price, dec!(62500000));
    assert_eq!(latest.low_price, dec!(60500000));
    assert_eq!(latest.trade_price, dec!(62000000));
    assert_eq!(latest.timestamp, 1_704_276_900_000);
    assert_eq!(latest.candle_acc_trade_price, dec!(250000000000.5));
    assert_eq!(latest.candle_acc_trade_volume, dec!(4000.25));
}

#[test]
fn test_day_candle_converts_to_window_start() {
    let candles: Vec<DayCandleResponse> =
        serde_json::from_str(CANDLES_DAYS_JSON).expect("Failed to deserialize day candles");

    let candle = candles[1].to_candle().expect("candle time should parse");

    assert_eq!(candle.timestamp, JAN_2);
    assert_eq!(candle.open, dec!(60000000));
    assert_eq!(candle.high, dec!(61500000));
    assert_eq!(candle.low, dec!(59500000));
    assert_eq!(candle.close, dec!(61000000));
    assert_eq!(candle.volume, dec!(3300.5));
}

#[test]
fn test_ticker_deserializes() {
    let tickers: Vec<TickerResponse> =
        serde_json::from_str(TICKER_JSON).expect("Failed to deserialize ticker");

    assert_eq!(tickers.len(), 1);
    let ticker = &tickers[0];
    assert_eq!(ticker.market, "KRW-BTC");
    assert_eq!(ticker.trade_price, dec!(62000000));
    assert_eq!(ticker.signed_change_rate, dec!(0.0163934426));
    assert_eq!(ticker.acc_trade_price_24h, dec!(300000000000.25));
    assert_eq!(ticker.acc_trade_volume_24h, dec!(5000.75));
    assert_eq!(ticker.timestamp, 1_704_276_900_123);
}

#[test]
fn test_ticker_and_candles_build_chronological_record() {
    let tickers: Vec<TickerResponse> =
        serde_json::from_str(TICKER_JSON).expect("Failed to deserialize ticker");
    let candles: Vec<DayCandleResponse> =
        serde_json::from_str(CANDLES_DAYS_JSON).expect("Failed to deserialize day candles");

    let candles = candles
        .iter()
        .map(DayCandleResponse::to_candle)
        .collect::<Result<Vec<_>, _>>()
        .expect("candle times should parse");
    let ticker = tickers.into_iter().next().expect("ticker missing");
    let record = ticker.into_record(candles);

    let timestamps: Vec<u64> = record.candles.iter().map(|c| c.timestamp).collect();
    assert_eq!(timestamps, vec![JAN_2, JAN_3]);
    assert_eq!(record.acc_trade_price, dec!(300000000000.25));
    assert_eq!(record.acc_trade_volume, dec!(5000.75));
    assert_eq!(record.change_rate, dec!(0.0163934426));
    assert_eq!(record.last_trade_timestamp, 1_704_276_900_000);
}

#[test]
fn test_trade_tick_deserializes() {
    let tick: TradeTick =
        serde_json::from_str(TRADE_TICK_JSON).expect("Failed to deserialize trade tick");

    assert_eq!(tick.market, "KRW-BTC");
    assert_eq!(tick.trade_price, dec!(62000000));
    assert_eq!(tick.trade_volume, dec!(0.012));
    assert_eq!(tick.timestamp, 1_704_276_900_000);
    assert_eq!(tick.acc_trade_price, dec!(300000000000.25));
    assert_eq!(tick.acc_trade_volume, dec!(5000.75));
    assert_eq!(tick.change_rate, dec!(0.0163934426));
}

#[test]
fn test_trade_tick_extends_latest_candle() {
    let tickers: Vec<TickerResponse> =
        serde_json::from_str(TICKER_JSON).expect("Failed to deserialize ticker");
    let candles: Vec<DayCandleResponse> =
        serde_json::from_str(CANDLES_DAYS_JSON).expect("Failed to deserialize day candles");
    let tick: TradeTick =
        serde_json::from_str(TRADE_TICK_JSON).expect("Failed to deserialize trade tick");

    let candles = candles
        .iter()
        .map(DayCandleResponse::to_candle)
        .collect::<Result<Vec<_>, _>>()
        .expect("candle times should parse");
    let mut record = tickers
        .into_iter()
        .next()
        .expect("ticker missing")
        .into_record(candles);

    assert!(record.apply_trade(&tick));

    assert_eq!(record.candles.len(), 2);
    let latest = record.candles.last().expect("candle missing");
    assert_eq!(latest.timestamp, JAN_3);
    assert_eq!(latest.close, dec!(62000000));
    assert_eq!(latest.volume, dec!(4000.262));
}

#[test]
fn test_api_error_deserializes() {
    let response: ApiErrorResponse =
        serde_json::from_str(API_ERROR_JSON).expect("Failed to deserialize api error");

    assert_eq!(response.error.name, "too_many_requests");
    assert_eq!(response.error.message, "Too many API requests.");
}
