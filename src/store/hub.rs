//! The coordinating component that owns the store.
//!
//! A [`Hub`] lives on a single thread. Effects it spawns run on the
//! surrounding [`tokio::task::LocalSet`] and interleave only while awaiting
//! the gateway, so every reducer call runs to completion without locking.

use std::cell::RefCell;
use std::rc::Rc;

use tokio::sync::{broadcast, watch};
use tokio::task;
use tracing::debug;

use super::action::{
    Action, AsyncEvent, Envelope, InitCandlesRequest, MarketNamesRequest, Request, RequestKey,
    RequestKind,
};
use super::effect::{Dispatch, RequestEffect};
use super::shape::{shape_catalog, shape_initial_series};
use super::startup::{StartupOutcome, run_startup};
use super::state::{AppState, Store};
use crate::RequestFailure;
use crate::gateway::MarketGateway;
use crate::models::{InitialSeries, MarketCatalog, MarketId};

/// Buffered actions per observer before the slowest one starts lagging.
const ACTION_CHANNEL_CAPACITY: usize = 256;

struct Inner {
    store: RefCell<Store>,
    market_names: RequestEffect<MarketNamesRequest, MarketCatalog>,
    init_candles: RequestEffect<InitCandlesRequest, InitialSeries>,
    state_tx: watch::Sender<AppState>,
    action_tx: broadcast::Sender<Action>,
}

/// Cheaply cloneable handle to the store and its request effects.
#[derive(Clone)]
pub struct Hub {
    inner: Rc<Inner>,
}

impl Hub {
    /// Creates a hub over `gateway` with the seeded default state.
    pub fn new<G: MarketGateway + 'static>(gateway: G) -> Self {
        Self::with_state(gateway, AppState::default())
    }

    /// Creates a hub over `gateway` starting from `state`.
    pub fn with_state<G: MarketGateway + 'static>(gateway: G, state: AppState) -> Self {
        let gateway = Rc::new(gateway);

        let catalog_gateway = Rc::clone(&gateway);
        let market_names = RequestEffect::<MarketNamesRequest, MarketCatalog>::new(
            move |()| {
                let gateway = Rc::clone(&catalog_gateway);
                async move { gateway.fetch_market_catalog().await }
            },
            shape_catalog,
        );

        let series_gateway = Rc::clone(&gateway);
        let init_candles = RequestEffect::<InitCandlesRequest, InitialSeries>::new(
            move |markets: Vec<MarketId>| {
                let gateway = Rc::clone(&series_gateway);
                async move { gateway.fetch_initial_series(&markets).await }
            },
            shape_initial_series,
        );

        let (state_tx, _) = watch::channel(state.clone());
        let (action_tx, _) = broadcast::channel(ACTION_CHANNEL_CAPACITY);

        Self {
            inner: Rc::new(Inner {
                store: RefCell::new(Store::new(state)),
                market_names,
                init_candles,
                state_tx,
                action_tx,
            }),
        }
    }

    /// Hands `action` to its effect, if it has one, then reduces it.
    ///
    /// The spawned effect cannot run before this returns, so its outcome is
    /// always reduced after the `Requested` event.
    ///
    /// # Panics
    ///
    /// `Requested` events and `StartInit` spawn work with
    /// [`task::spawn_local`] and panic outside a `LocalSet`. The store is
    /// left untouched in that case.
    pub fn dispatch(&self, action: Action) {
        self.route(action.clone());
        self.reduce(&action);
    }

    /// Emits `Requested` for the market catalog and awaits the outcome.
    ///
    /// # Errors
    ///
    /// Returns the failure dispatched as `Failed`.
    pub async fn request_market_names(&self) -> Result<MarketCatalog, RequestFailure> {
        self.request(&self.inner.market_names, ()).await
    }

    /// Emits `Requested` for the initial series of `markets` and awaits the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns the failure dispatched as `Failed`.
    pub async fn request_init_candles(
        &self,
        markets: Vec<MarketId>,
    ) -> Result<InitialSeries, RequestFailure> {
        self.request(&self.inner.init_candles, markets).await
    }

    /// Runs the startup sequence to completion.
    pub async fn run_startup(&self) -> StartupOutcome {
        run_startup(self).await
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.inner.store.borrow().state().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.inner.state_tx.subscribe()
    }

    /// Receiver for every action reduced from now on.
    pub fn actions(&self) -> broadcast::Receiver<Action> {
        self.inner.action_tx.subscribe()
    }

    pub fn is_loading(&self, key: &RequestKey) -> bool {
        self.inner.store.borrow().loading().is_loading(key)
    }

    /// Start/finish flag per request kind, for spinners.
    pub fn is_kind_loading(&self, kind: RequestKind) -> bool {
        self.inner.store.borrow().loading().is_kind_loading(kind)
    }

    /// Number of gateway calls currently outstanding.
    pub fn in_flight(&self) -> usize {
        self.inner.store.borrow().loading().in_flight()
    }

    async fn request<Q: Request, Raw>(
        &self,
        effect: &RequestEffect<Q, Raw>,
        param: Q::Param,
    ) -> Result<Q::Output, RequestFailure> {
        let envelope = Q::requested(param.clone());
        let key = envelope.key.clone();
        // Reduced without routing: this task runs the effect itself.
        self.reduce(&Q::into_action(envelope));
        effect.execute(self, key, param).await
    }

    fn reduce(&self, action: &Action) {
        debug!(action = action.label(), "Reducing action");
        {
            let mut store = self.inner.store.borrow_mut();
            store.apply(action);
            self.inner.state_tx.send_replace(store.state().clone());
        }
        // No observers is fine.
        let _ = self.inner.action_tx.send(action.clone());
    }

    /// Handler table from requests to effects.
    fn route(&self, action: Action) {
        match action {
            Action::StartInit => {
                let hub = self.clone();
                task::spawn_local(async move {
                    hub.run_startup().await;
                });
            }
            Action::MarketNames(Envelope {
                key,
                event: AsyncEvent::Requested(param),
            }) => {
                let hub = self.clone();
                task::spawn_local(async move {
                    let _ = hub.inner.market_names.execute(&hub, key, param).await;
                });
            }
            Action::InitCandles(Envelope {
                key,
                event: AsyncEvent::Requested(markets),
            }) => {
                let hub = self.clone();
                task::spawn_local(async move {
                    let _ = hub.inner.init_candles.execute(&hub, key, markets).await;
                });
            }
            Action::MarketNames(_) | Action::InitCandles(_) | Action::Trade(_) => {}
        }
    }
}

impl Dispatch for Hub {
    fn dispatch(&self, action: Action) {
        Hub::dispatch(self, action);
    }
}
