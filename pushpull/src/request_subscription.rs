// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::bridge::{Bridge, Cardinality};
use crate::config::BridgeConfig;
use crate::kind::StreamKind;
use crate::registration::RequestRegistration;
use crate::snapshot::BridgeSnapshot;
use crate::source::{ProductRequest, RequestDelegate};
use core::fmt;
use pushpull_core::{Demand, Subscriber, Subscription};
use std::sync::Arc;

/// One-shot subscription to a [`ProductRequest`].
///
/// Starts with one unit of demand, so the subscriber receives the response without
/// requesting anything. A response is followed immediately by completion; a failure
/// is delivered instead of any value. Cancelling, or dropping the last handle, before
/// the request answers cancels the request itself.
pub struct RequestSubscription<R, S>
where
    R: ProductRequest,
    S: Subscriber<Input = R::Response, Failure = R::Error>,
{
    bridge: Bridge<S, RequestRegistration<R>>,
}

impl<R, S> RequestSubscription<R, S>
where
    R: ProductRequest,
    S: Subscriber<Input = R::Response, Failure = R::Error>,
{
    pub(crate) fn attach(request: &Arc<R>, config: &BridgeConfig, subscriber: S) -> Arc<Self> {
        let this = Arc::new(Self {
            bridge: Bridge::new(StreamKind::Response, Cardinality::Single, config, subscriber),
        });

        this.bridge.open(Arc::clone(&this) as Arc<dyn Subscription>);
        if !this.bridge.is_active() {
            return this;
        }

        let delegate: Arc<dyn RequestDelegate<R>> = Arc::clone(&this) as _;
        let registration = RequestRegistration::register(request, Arc::downgrade(&delegate));
        this.bridge.install(registration);

        if this.bridge.is_active() {
            request.start();
        }
        this
    }

    /// Current bookkeeping state.
    pub fn snapshot(&self) -> BridgeSnapshot {
        self.bridge.snapshot()
    }
}

impl<R, S> RequestDelegate<R> for RequestSubscription<R, S>
where
    R: ProductRequest,
    S: Subscriber<Input = R::Response, Failure = R::Error>,
{
    fn did_receive(&self, response: R::Response) {
        self.bridge.receive_batch(response, StreamKind::Response);
    }

    fn did_fail(&self, error: R::Error) {
        self.bridge.fail(error);
    }
}

impl<R, S> Subscription for RequestSubscription<R, S>
where
    R: ProductRequest,
    S: Subscriber<Input = R::Response, Failure = R::Error>,
{
    fn request(&self, demand: Demand) {
        self.bridge.request(demand);
    }

    fn cancel(&self) {
        self.bridge.cancel();
    }
}

impl<R, S> fmt::Display for RequestSubscription<R, S>
where
    R: ProductRequest,
    S: Subscriber<Input = R::Response, Failure = R::Error>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("product request observer")
    }
}

impl<R, S> fmt::Debug for RequestSubscription<R, S>
where
    R: ProductRequest,
    S: Subscriber<Input = R::Response, Failure = R::Error>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSubscription")
            .field("state", &self.snapshot())
            .finish()
    }
}
