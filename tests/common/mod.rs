//! Shared test utilities: an in-memory gateway and record builders.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::{Notify, broadcast};

use coinboard::gateway::MarketGateway;
use coinboard::models::{Candle, InitialSeries, MarketCatalog, MarketId, MarketRecord};
use coinboard::store::Action;
use coinboard::{CoinboardError, Result};

/// Upper bound on how long a test waits for an asynchronous outcome.
pub const WAIT: Duration = Duration::from_secs(5);

/// A gateway call observed by [`FakeGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Catalog,
    Series(Vec<MarketId>),
}

/// In-memory [`MarketGateway`] with canned answers.
pub struct FakeGateway {
    catalog: std::result::Result<MarketCatalog, String>,
    series: std::result::Result<InitialSeries, String>,
    calls: Rc<RefCell<Vec<Call>>>,
    gate: Option<Rc<Notify>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            catalog: Ok(MarketCatalog::new()),
            series: Ok(InitialSeries::new()),
            calls: Rc::default(),
            gate: None,
        }
    }

    pub fn with_catalog(mut self, entries: &[(&str, &str)]) -> Self {
        self.catalog = Ok(entries
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect());
        self
    }

    pub fn with_series(mut self, series: InitialSeries) -> Self {
        self.series = Ok(series);
        self
    }

    pub fn failing_catalog(mut self, description: &str) -> Self {
        self.catalog = Err(description.to_string());
        self
    }

    pub fn failing_series(mut self, description: &str) -> Self {
        self.series = Err(description.to_string());
        self
    }

    /// Makes every call wait for a permit on `gate` before answering.
    pub fn gated(mut self, gate: Rc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Shared log of calls, still readable after the gateway moves into a hub.
    pub fn calls(&self) -> Rc<RefCell<Vec<Call>>> {
        Rc::clone(&self.calls)
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

impl MarketGateway for FakeGateway {
    async fn fetch_market_catalog(&self) -> Result<MarketCatalog> {
        self.calls.borrow_mut().push(Call::Catalog);
        self.pass_gate().await;
        self.catalog.clone().map_err(CoinboardError::Transport)
    }

    async fn fetch_initial_series(&self, markets: &[MarketId]) -> Result<InitialSeries> {
        self.calls.borrow_mut().push(Call::Series(markets.to_vec()));
        self.pass_gate().await;
        self.series.clone().map_err(CoinboardError::Transport)
    }
}

/// A record with one daily candle closing at `close`.
pub fn record(close: Decimal, acc_trade_price: Decimal, change_rate: Decimal) -> MarketRecord {
    MarketRecord {
        candles: vec![Candle {
            timestamp: 1_704_153_600_000,
            open: close,
            high: close,
            low: close,
            close,
            volume: Decimal::ONE,
        }],
        acc_trade_price,
        acc_trade_volume: Decimal::ONE,
        change_rate,
        last_trade_timestamp: 1_704_153_600_000,
    }
}

/// Drains every action already broadcast to `rx` into log labels.
pub fn drain_labels(rx: &mut broadcast::Receiver<Action>) -> Vec<String> {
    let mut labels = Vec::new();
    while let Ok(action) = rx.try_recv() {
        labels.push(action.label());
    }
    labels
}

/// Waits until an action matching `predicate` is broadcast.
pub async fn wait_for_action<F>(rx: &mut broadcast::Receiver<Action>, predicate: F) -> Action
where
    F: Fn(&Action) -> bool,
{
    tokio::time::timeout(WAIT, async {
        loop {
            let action = rx.recv().await.expect("action channel closed");
            if predicate(&action) {
                return action;
            }
        }
    })
    .await
    .expect("timed out waiting for action")
}
