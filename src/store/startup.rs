//! Startup sequencing: fetch the catalog, then the initial series of every
//! market in it.

use tracing::{error, info, warn};

use super::hub::Hub;
use crate::RequestFailure;
use crate::models::MarketId;

/// How a startup run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupOutcome {
    /// Both phases succeeded; `markets` records were merged.
    Completed { markets: usize },
    /// The catalog could not be fetched; the series was never requested.
    CatalogFailed(RequestFailure),
    /// The catalog was fetched but the series request failed.
    SeriesFailed(RequestFailure),
}

impl StartupOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StartupOutcome::Completed { .. })
    }
}

/// Runs both startup phases in order. Never retries.
///
/// The series request is only emitted after the catalog outcome has been
/// reduced, and carries every market id of the fetched catalog in a single
/// batch.
pub async fn run_startup(hub: &Hub) -> StartupOutcome {
    info!("Startup: fetching market catalog");
    let catalog = match hub.request_market_names().await {
        Ok(catalog) => catalog,
        Err(failure) => {
            error!(error = %failure, "Startup aborted: market catalog unavailable");
            return StartupOutcome::CatalogFailed(failure);
        }
    };

    let mut markets: Vec<MarketId> = catalog.into_keys().collect();
    markets.sort();

    info!(markets = markets.len(), "Startup: fetching initial series");
    match hub.request_init_candles(markets).await {
        Ok(series) => {
            info!(markets = series.len(), "Startup completed");
            StartupOutcome::Completed {
                markets: series.len(),
            }
        }
        Err(failure) => {
            warn!(error = %failure, "Startup finished without initial series");
            StartupOutcome::SeriesFailed(failure)
        }
    }
}
