//! HTTP gateway for the Upbit public REST API.

use std::collections::HashMap;

use futures_util::{StreamExt, stream};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use super::MarketGateway;
use crate::config::UpbitConfig;
use crate::models::market::{ApiErrorResponse, DayCandleResponse, MarketInfo, TickerResponse};
use crate::models::{Candle, InitialSeries, MarketCatalog, MarketId};
use crate::{CoinboardError, Result};

/// Upper bound on concurrent candle requests.
const MAX_CONCURRENT_CANDLE_REQUESTS: usize = 8;

/// Status Upbit answers with once the per-second request budget is spent.
const TOO_MANY_REQUESTS: u16 = 429;

/// [`MarketGateway`] backed by `api.upbit.com`.
pub struct UpbitGateway {
    client: reqwest::Client,
    config: UpbitConfig,
}

impl UpbitGateway {
    /// Builds a gateway whose requests time out after
    /// `config.request_timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`CoinboardError::Http`] if the HTTP client cannot be built.
    pub fn new(config: UpbitConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Sends a GET request, retrying throttled answers up to
    /// `config.max_retries` times with doubling backoff.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.config.api_url, path);
        let mut attempt = 0;

        loop {
            match self.send(&url, query).await {
                Err(CoinboardError::Api {
                    status: TOO_MANY_REQUESTS,
                    ..
                }) if attempt < self.config.max_retries => {
                    let wait = self
                        .config
                        .retry_backoff
                        .saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    warn!(url, attempt, ?wait, "Throttled, retrying");
                    time::sleep(wait).await;
                }
                result => return result,
            }
        }
    }

    async fn send<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!(url, ?query, "Sending GET request");

        let response = self
            .client
            .get(url)
            .query(query)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!(url, status = status.as_u16(), message, "Request rejected");
            return Err(CoinboardError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_day_candles(&self, market: &str) -> Result<Vec<Candle>> {
        let responses: Vec<DayCandleResponse> = self
            .get_json(
                "candles/days",
                &[
                    ("market", market.to_string()),
                    ("count", self.config.candle_count.to_string()),
                ],
            )
            .await?;

        responses.iter().map(DayCandleResponse::to_candle).collect()
    }

    /// Fetches candles for every market, starting at most one request per
    /// `config.request_spacing`. Each market keeps its own outcome.
    async fn fetch_candle_batch(&self, markets: &[MarketId]) -> Vec<(MarketId, Result<Vec<Candle>>)> {
        let started = Instant::now();
        let spacing = self.config.request_spacing;

        stream::iter(markets.iter().enumerate())
            .map(|(slot, market)| async move {
                let offset = spacing.saturating_mul(u32::try_from(slot).unwrap_or(u32::MAX));
                time::sleep_until(started + offset).await;
                (market.clone(), self.fetch_day_candles(market).await)
            })
            .buffered(MAX_CONCURRENT_CANDLE_REQUESTS)
            .collect()
            .await
    }
}

impl MarketGateway for UpbitGateway {
    async fn fetch_market_catalog(&self) -> Result<MarketCatalog> {
        let markets: Vec<MarketInfo> = self.get_json("market/all", &[]).await?;
        info!(count = markets.len(), "Fetched market catalog");

        Ok(markets
            .into_iter()
            .map(|m| (m.market, m.korean_name))
            .collect())
    }

    /// Markets whose candles cannot be fetched are left out of the series.
    /// The call only fails when the ticker request fails or no market at
    /// all yields candles.
    async fn fetch_initial_series(&self, markets: &[MarketId]) -> Result<InitialSeries> {
        if markets.is_empty() {
            return Ok(InitialSeries::new());
        }

        let tickers: Vec<TickerResponse> = self
            .get_json("ticker", &[("markets", markets.join(","))])
            .await?;

        let mut candles: HashMap<MarketId, Vec<Candle>> = HashMap::with_capacity(markets.len());
        let mut first_error = None;
        for (market, result) in self.fetch_candle_batch(markets).await {
            match result {
                Ok(market_candles) => {
                    candles.insert(market, market_candles);
                }
                Err(err) => {
                    warn!(market, error = %err, "Leaving market out of initial series");
                    first_error.get_or_insert(err);
                }
            }
        }
        if candles.is_empty() {
            if let Some(err) = first_error {
                return Err(err);
            }
        }

        let mut series = InitialSeries::with_capacity(tickers.len());
        for ticker in tickers {
            let Some(market_candles) = candles.remove(&ticker.market) else {
                warn!(market = ticker.market, "Ticker without requested candles");
                continue;
            };
            let market = ticker.market.clone();
            series.insert(market, ticker.into_record(market_candles));
        }

        info!(
            requested = markets.len(),
            received = series.len(),
            "Fetched initial series"
        );
        Ok(series)
    }
}
