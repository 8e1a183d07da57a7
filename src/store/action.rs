//! Async action taxonomy.
//!
//! Every remote request kind has exactly three events: `Requested`,
//! `Succeeded` and `Failed`. They travel inside an [`Envelope`] that carries
//! the [`RequestKey`] correlating an outcome with the request it answers.

use std::fmt;
use std::fmt::Debug;

use crate::RequestFailure;
use crate::models::{InitialSeries, MarketCatalog, MarketId, TradeTick};

/// Class of remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Fetch of the market catalog.
    MarketNames,
    /// Batched fetch of the initial candle series.
    InitCandles,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::MarketNames => "market-catalog",
            RequestKind::InitCandles => "initial-series",
        }
    }

    /// The store slice a successful result of this kind is merged into.
    pub fn slice(&self) -> SliceName {
        match self {
            RequestKind::MarketNames => SliceName::MarketName,
            RequestKind::InitCandles => SliceName::Candle,
        }
    }
}

/// Named partition of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceName {
    MarketName,
    Candle,
}

impl SliceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SliceName::MarketName => "marketName",
            SliceName::Candle => "candle",
        }
    }
}

/// Identifies one logical operation: a kind plus its correlating parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub kind: RequestKind,
    pub param: Option<String>,
}

impl RequestKey {
    pub fn new(kind: RequestKind, param: Option<String>) -> Self {
        Self { kind, param }
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}({})", self.kind.as_str(), param),
            None => f.write_str(self.kind.as_str()),
        }
    }
}

/// Request parameters that contribute to the request key.
pub trait RequestParam {
    fn correlation(&self) -> Option<String>;
}

impl RequestParam for () {
    fn correlation(&self) -> Option<String> {
        None
    }
}

impl RequestParam for Vec<MarketId> {
    fn correlation(&self) -> Option<String> {
        Some(self.join(","))
    }
}

/// The three states of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncEvent<P, R> {
    Requested(P),
    Succeeded(R),
    Failed(RequestFailure),
}

/// An event tagged with the key of the request it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<P, R> {
    pub key: RequestKey,
    pub event: AsyncEvent<P, R>,
}

impl<P, R> Envelope<P, R> {
    /// The outcome carried by this envelope, if it is not a request.
    pub fn outcome(&self) -> Option<Result<&R, &RequestFailure>> {
        match &self.event {
            AsyncEvent::Requested(_) => None,
            AsyncEvent::Succeeded(result) => Some(Ok(result)),
            AsyncEvent::Failed(failure) => Some(Err(failure)),
        }
    }
}

/// Static description of a request kind: its parameter and result types and
/// the [`Action`] variant its envelopes travel in.
pub trait Request {
    type Param: RequestParam + Clone + Debug + 'static;
    type Output: Clone + Debug + 'static;

    const KIND: RequestKind;

    fn into_action(envelope: Envelope<Self::Param, Self::Output>) -> Action;

    fn key(param: &Self::Param) -> RequestKey {
        RequestKey::new(Self::KIND, param.correlation())
    }

    fn requested(param: Self::Param) -> Envelope<Self::Param, Self::Output> {
        Envelope {
            key: Self::key(&param),
            event: AsyncEvent::Requested(param),
        }
    }
}

/// Market catalog request.
#[derive(Debug)]
pub struct MarketNamesRequest;

impl Request for MarketNamesRequest {
    type Param = ();
    type Output = MarketCatalog;

    const KIND: RequestKind = RequestKind::MarketNames;

    fn into_action(envelope: Envelope<(), MarketCatalog>) -> Action {
        Action::MarketNames(envelope)
    }
}

/// Initial series request for a list of markets.
#[derive(Debug)]
pub struct InitCandlesRequest;

impl Request for InitCandlesRequest {
    type Param = Vec<MarketId>;
    type Output = InitialSeries;

    const KIND: RequestKind = RequestKind::InitCandles;

    fn into_action(envelope: Envelope<Vec<MarketId>, InitialSeries>) -> Action {
        Action::InitCandles(envelope)
    }
}

/// Everything the store reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run the startup sequence.
    StartInit,
    MarketNames(Envelope<(), MarketCatalog>),
    InitCandles(Envelope<Vec<MarketId>, InitialSeries>),
    /// A parsed trade from the live feed.
    Trade(TradeTick),
}

impl Action {
    /// Short label used in logs.
    pub fn label(&self) -> String {
        let (key, state) = match self {
            Action::StartInit => return "START_INIT".to_string(),
            Action::Trade(tick) => return format!("TRADE({})", tick.market),
            Action::MarketNames(env) => (&env.key, event_state(&env.event)),
            Action::InitCandles(env) => (&env.key, event_state(&env.event)),
        };
        format!("{key}/{state}")
    }
}

fn event_state<P, R>(event: &AsyncEvent<P, R>) -> &'static str {
    match event {
        AsyncEvent::Requested(_) => "REQUESTED",
        AsyncEvent::Succeeded(_) => "SUCCEEDED",
        AsyncEvent::Failed(_) => "FAILED",
    }
}

/// Starts the catalog-then-series startup sequence.
pub fn start_init() -> Action {
    Action::StartInit
}

/// Requests the market catalog.
pub fn get_market_names() -> Action {
    MarketNamesRequest::into_action(MarketNamesRequest::requested(()))
}

/// Requests the initial series for `markets`.
pub fn get_init_candles(markets: Vec<MarketId>) -> Action {
    InitCandlesRequest::into_action(InitCandlesRequest::requested(markets))
}
