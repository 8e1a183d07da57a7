//! Store state and the root reducer.

use serde::Serialize;
use tracing::{debug, warn};

use super::action::{Action, SliceName};
use super::loading::LoadingTracker;
use super::slice::{KeyedReducer, SliceState, merge_keyed};
use crate::models::{MarketRecord, TradeTick};

/// Market seeded before the catalog has been fetched.
pub const DEFAULT_MARKET: &str = "KRW-BTC";

const DEFAULT_MARKET_NAME: &str = "비트코인";

const MARKET_NAME_REDUCER: KeyedReducer<String> =
    KeyedReducer::new(SliceName::MarketName, merge_keyed);

const CANDLE_REDUCER: KeyedReducer<MarketRecord> =
    KeyedReducer::new(SliceName::Candle, merge_keyed);

/// All slices rendered by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Market id to display name.
    pub market_name: SliceState<String>,
    /// Market id to candle record.
    pub candle: SliceState<MarketRecord>,
}

impl Default for AppState {
    /// One known market, with an empty record, before anything is fetched.
    fn default() -> Self {
        Self {
            market_name: SliceState::new(
                [(DEFAULT_MARKET.to_string(), DEFAULT_MARKET_NAME.to_string())].into(),
            ),
            candle: SliceState::new([(DEFAULT_MARKET.to_string(), MarketRecord::default())].into()),
        }
    }
}

/// Pure root reducer: routes each action to the slice it concerns.
pub fn reduce(state: AppState, action: &Action) -> AppState {
    match action {
        Action::StartInit => state,
        Action::MarketNames(envelope) => AppState {
            market_name: MARKET_NAME_REDUCER.reduce(state.market_name, envelope),
            ..state
        },
        Action::InitCandles(envelope) => AppState {
            candle: CANDLE_REDUCER.reduce(state.candle, envelope),
            ..state
        },
        Action::Trade(tick) => AppState {
            candle: apply_trade(state.candle, tick),
            ..state
        },
    }
}

fn apply_trade(mut candle: SliceState<MarketRecord>, tick: &TradeTick) -> SliceState<MarketRecord> {
    match candle.data.get_mut(&tick.market) {
        Some(record) => {
            if !record.apply_trade(tick) {
                debug!(market = tick.market, timestamp = tick.timestamp, "Dropped stale trade");
            }
        }
        None => warn!(market = tick.market, "Trade for unknown market"),
    }
    candle
}

/// State plus loading tracker, updated together for every action.
#[derive(Debug, Clone, Default)]
pub struct Store {
    state: AppState,
    loading: LoadingTracker,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            loading: LoadingTracker::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn loading(&self) -> &LoadingTracker {
        &self.loading
    }

    /// Applies one action. Never suspends.
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::MarketNames(envelope) => self.loading.observe(envelope),
            Action::InitCandles(envelope) => self.loading.observe(envelope),
            Action::StartInit | Action::Trade(_) => {}
        }
        self.state = reduce(std::mem::take(&mut self.state), action);
    }
}
