//! Shaping functions turning gateway results into slice payloads.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{InitialSeries, MarketCatalog, MarketId};

/// The catalog is stored as returned.
pub fn shape_catalog(raw: MarketCatalog, _: &()) -> MarketCatalog {
    raw
}

/// Keeps only the requested markets and orders each record's candles
/// oldest first.
pub fn shape_initial_series(raw: InitialSeries, requested: &Vec<MarketId>) -> InitialSeries {
    let requested: HashSet<&str> = requested.iter().map(String::as_str).collect();

    raw.into_iter()
        .filter(|(market, _)| {
            let wanted = requested.contains(market.as_str());
            if !wanted {
                debug!(market, "Dropping unrequested market from series");
            }
            wanted
        })
        .map(|(market, mut record)| {
            record.normalize_candles();
            (market, record)
        })
        .collect()
}
