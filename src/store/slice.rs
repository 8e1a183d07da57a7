//! Keyed slices of the store and the reducer factory that updates them.

use std::collections::HashMap;

use serde::Serialize;

use super::action::{AsyncEvent, Envelope, SliceName};
use crate::RequestFailure;
use crate::models::MarketId;

/// Data of one slice, keyed by market.
pub type SliceData<V> = HashMap<MarketId, V>;

/// Merges a success payload into the current slice data.
pub type Merge<V> = fn(SliceData<V>, SliceData<V>) -> SliceData<V>;

/// A named partition of the store: last error plus keyed data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceState<V> {
    pub error: Option<RequestFailure>,
    pub data: SliceData<V>,
}

impl<V> SliceState<V> {
    pub fn new(data: SliceData<V>) -> Self {
        Self { error: None, data }
    }
}

impl<V> Default for SliceState<V> {
    fn default() -> Self {
        Self::new(SliceData::new())
    }
}

/// Inserts or overwrites every key of `incoming`, leaving the rest alone.
pub fn merge_keyed<V>(mut current: SliceData<V>, incoming: SliceData<V>) -> SliceData<V> {
    current.extend(incoming);
    current
}

/// Reducer for one slice, built from the slice name and a merge function.
#[derive(Debug)]
pub struct KeyedReducer<V> {
    slice: SliceName,
    merge: Merge<V>,
}

impl<V: Clone> KeyedReducer<V> {
    pub const fn new(slice: SliceName, merge: Merge<V>) -> Self {
        Self { slice, merge }
    }

    pub fn slice(&self) -> SliceName {
        self.slice
    }

    /// Applies `envelope` to `state`.
    ///
    /// Success clears the error and merges the payload; failure records the
    /// error and keeps the data. Requests, and envelopes of kinds that
    /// target another slice, return the state unchanged.
    pub fn reduce<P>(
        &self,
        state: SliceState<V>,
        envelope: &Envelope<P, SliceData<V>>,
    ) -> SliceState<V> {
        if envelope.key.kind.slice() != self.slice {
            return state;
        }

        match &envelope.event {
            AsyncEvent::Requested(_) => state,
            AsyncEvent::Succeeded(payload) => SliceState {
                error: None,
                data: (self.merge)(state.data, payload.clone()),
            },
            AsyncEvent::Failed(failure) => SliceState {
                error: Some(failure.clone()),
                data: state.data,
            },
        }
    }
}
