//! Per-request loading state.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::action::{AsyncEvent, Envelope, RequestKey, RequestKind};

/// Tracks which request keys have a gateway call outstanding.
///
/// Same-key requests are not coalesced: each `begin` is matched by its own
/// `end`, and a key stays loading until the last of them finishes.
#[derive(Debug, Clone, Default)]
pub struct LoadingTracker {
    in_flight: HashMap<RequestKey, usize>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, key: RequestKey) {
        let count = self.in_flight.entry(key).or_default();
        *count += 1;
        if *count > 1 {
            debug!(in_flight = *count, "Request already in flight, issuing another call");
        }
    }

    pub fn end(&mut self, key: &RequestKey) {
        let Some(count) = self.in_flight.get_mut(key) else {
            warn!(key = %key, "Request finished without being started");
            return;
        };
        *count -= 1;
        if *count == 0 {
            self.in_flight.remove(key);
        }
    }

    pub fn is_loading(&self, key: &RequestKey) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Whether any request of `kind` is in flight, regardless of parameter.
    pub fn is_kind_loading(&self, kind: RequestKind) -> bool {
        self.in_flight.keys().any(|key| key.kind == kind)
    }

    /// Number of outstanding gateway calls.
    pub fn in_flight(&self) -> usize {
        self.in_flight.values().sum()
    }

    /// Begins on `Requested`, ends on `Succeeded` or `Failed`.
    pub fn observe<P, R>(&mut self, envelope: &Envelope<P, R>) {
        match envelope.event {
            AsyncEvent::Requested(_) => self.begin(envelope.key.clone()),
            AsyncEvent::Succeeded(_) | AsyncEvent::Failed(_) => self.end(&envelope.key),
        }
    }
}
