//! Remote data gateway consumed by the request effects.
//!
//! The store never talks to the network directly: it is handed a
//! [`MarketGateway`] and wraps its two calls into request effects.
//! [`upbit::UpbitGateway`] is the HTTP implementation used by the binary.

pub mod upbit;

use std::future::Future;

use crate::Result;
use crate::models::{InitialSeries, MarketCatalog, MarketId};

pub use upbit::UpbitGateway;

/// Source of market reference data and initial candle series.
///
/// A call either resolves or fails; deadlines are the implementation's
/// concern.
pub trait MarketGateway {
    /// Fetches every tradable market with its display name.
    fn fetch_market_catalog(&self) -> impl Future<Output = Result<MarketCatalog>>;

    /// Fetches the initial candle snapshot for each of `markets` in one batch.
    fn fetch_initial_series(
        &self,
        markets: &[MarketId],
    ) -> impl Future<Output = Result<InitialSeries>>;
}
