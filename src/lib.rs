//! Data orchestration core for an Upbit market dashboard.
//!
//! Fetches the market catalog and initial candle series through a
//! [`gateway::MarketGateway`], tracks per-request loading and error state,
//! and merges results into keyed store slices owned by a [`store::Hub`].

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod store;

pub use error::{CoinboardError, RequestFailure, Result};
