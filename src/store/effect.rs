//! Request effects: "call the gateway, shape the result, dispatch the
//! outcome" for any request kind.

use std::future::Future;
use std::marker::PhantomData;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use tracing::{debug, info, warn};

use super::action::{Action, AsyncEvent, Envelope, Request, RequestKey};
use crate::RequestFailure;

/// Sink for actions produced by running effects.
pub trait Dispatch {
    fn dispatch(&self, action: Action);
}

type GatewayCall<P, Raw> = Box<dyn Fn(P) -> LocalBoxFuture<'static, crate::Result<Raw>>>;

type Shape<P, Raw, R> = Box<dyn Fn(Raw, &P) -> R>;

/// Reusable unit of work for the request kind `Q`.
///
/// Built once from a gateway call and a pure shaping function, then run any
/// number of times with [`RequestEffect::execute`].
pub struct RequestEffect<Q: Request, Raw> {
    call: GatewayCall<Q::Param, Raw>,
    shape: Shape<Q::Param, Raw, Q::Output>,
    _request: PhantomData<Q>,
}

impl<Q: Request, Raw> RequestEffect<Q, Raw> {
    pub fn new<C, Fut, S>(call: C, shape: S) -> Self
    where
        C: Fn(Q::Param) -> Fut + 'static,
        Fut: Future<Output = crate::Result<Raw>> + 'static,
        S: Fn(Raw, &Q::Param) -> Q::Output + 'static,
    {
        Self {
            call: Box::new(move |param| call(param).boxed_local()),
            shape: Box::new(shape),
            _request: PhantomData,
        }
    }

    /// Runs the gateway call for `param` and dispatches its outcome under
    /// `key`.
    ///
    /// The `Requested` event must already have been dispatched by the
    /// caller. Exactly one `Succeeded` or `Failed` is dispatched before this
    /// returns, and the same outcome is handed back to the caller.
    ///
    /// # Errors
    ///
    /// Returns the [`RequestFailure`] that was dispatched as `Failed`.
    pub async fn execute<D>(
        &self,
        dispatcher: &D,
        key: RequestKey,
        param: Q::Param,
    ) -> Result<Q::Output, RequestFailure>
    where
        D: Dispatch + ?Sized,
    {
        debug!(key = %key, ?param, "Calling gateway");

        match (self.call)(param.clone()).await {
            Ok(raw) => {
                let shaped = (self.shape)(raw, &param);
                info!(
                    key = %key,
                    slice = Q::KIND.slice().as_str(),
                    "Request succeeded"
                );
                dispatcher.dispatch(Q::into_action(Envelope {
                    key,
                    event: AsyncEvent::Succeeded(shaped.clone()),
                }));
                Ok(shaped)
            }
            Err(err) => {
                let failure = RequestFailure::from(err);
                warn!(
                    key = %key,
                    slice = Q::KIND.slice().as_str(),
                    error = %failure,
                    "Request failed"
                );
                dispatcher.dispatch(Q::into_action(Envelope {
                    key,
                    event: AsyncEvent::Failed(failure.clone()),
                }));
                Err(failure)
            }
        }
    }
}
