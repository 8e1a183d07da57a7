//! Asynchronous data orchestration for the dashboard.
//!
//! This module is organized by concern:
//! - [`action`] - Request kinds, keys, and the events flowing through the store
//! - [`effect`] - Gateway calls wrapped into reusable request effects
//! - [`loading`] - Per-request in-flight tracking
//! - [`shape`] - Shaping of gateway results into slice payloads
//! - [`slice`] - Keyed slices and their reducer factory
//! - [`state`] - Store state and the root reducer
//! - [`hub`] - The single-threaded coordinator that owns the store
//! - [`startup`] - The catalog-then-series startup sequence

pub mod action;
pub mod effect;
pub mod hub;
pub mod loading;
pub mod shape;
pub mod slice;
pub mod startup;
pub mod state;

pub use action::{
    Action, AsyncEvent, Envelope, RequestKey, RequestKind, SliceName, get_init_candles,
    get_market_names, start_init,
};
pub use effect::{Dispatch, RequestEffect};
pub use hub::Hub;
pub use loading::LoadingTracker;
pub use slice::{KeyedReducer, SliceState, merge_keyed};
pub use startup::StartupOutcome;
pub use state::{AppState, DEFAULT_MARKET, Store};
