// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::bridge::{Bridge, Cardinality};
use crate::config::BridgeConfig;
use crate::kind::{QueueChannel, StreamKind};
use crate::registration::{self, BatchCallback, QueueRegistration};
use crate::snapshot::BridgeSnapshot;
use crate::source::TransactionQueue;
use core::fmt;
use pushpull_core::{Demand, Subscriber, Subscription};
use std::sync::{Arc, Weak};

/// Continuous subscription to one channel of a [`TransactionQueue`].
///
/// Each source callback is one batch. Batches arriving without outstanding demand
/// are handled by the configured [`OverflowPolicy`](crate::OverflowPolicy). The
/// subscription ends on cancel, on a restore failure, or when its last handle is
/// dropped; it leaves the queue exactly once in every case.
///
/// Source callbacks only hold the subscription weakly. Keep the returned handle
/// (or let the subscriber keep the one it receives) for as long as batches are wanted.
pub struct QueueSubscription<Q, S>
where
    Q: TransactionQueue,
    S: Subscriber<Input = Vec<Q::Transaction>, Failure = Q::Error>,
{
    bridge: Bridge<S, QueueRegistration<Q>>,
}

impl<Q, S> QueueSubscription<Q, S>
where
    Q: TransactionQueue,
    S: Subscriber<Input = Vec<Q::Transaction>, Failure = Q::Error>,
{
    pub(crate) fn attach(
        queue: &Arc<Q>,
        channel: QueueChannel,
        config: &BridgeConfig,
        subscriber: S,
    ) -> Arc<Self> {
        let this = Arc::new(Self {
            bridge: Bridge::new(channel.into(), Cardinality::Continuous, config, subscriber),
        });

        this.bridge.open(Arc::clone(&this) as Arc<dyn Subscription>);
        if !this.bridge.is_active() {
            return this;
        }

        let weak = Arc::downgrade(&this);
        let forward = Self::forward(&weak, channel.into());
        let (on_updated, on_removed) = match channel {
            QueueChannel::Updates => (Some(forward), None),
            QueueChannel::Deletions => (None, Some(forward)),
        };
        let on_failure = Box::new(move |error: Q::Error| {
            if let Some(this) = weak.upgrade() {
                this.bridge.fail(error);
            }
        });

        let registration = registration::register(queue, on_updated, on_removed, on_failure);
        this.bridge.install(registration);
        this
    }

    fn forward(weak: &Weak<Self>, tag: StreamKind) -> BatchCallback<Q::Transaction> {
        let weak = Weak::clone(weak);
        Box::new(move |batch| {
            if let Some(this) = weak.upgrade() {
                this.bridge.receive_batch(batch, tag);
            }
        })
    }

    /// Current bookkeeping state.
    pub fn snapshot(&self) -> BridgeSnapshot {
        self.bridge.snapshot()
    }
}

impl<Q, S> Subscription for QueueSubscription<Q, S>
where
    Q: TransactionQueue,
    S: Subscriber<Input = Vec<Q::Transaction>, Failure = Q::Error>,
{
    fn request(&self, demand: Demand) {
        self.bridge.request(demand);
    }

    fn cancel(&self) {
        self.bridge.cancel();
    }
}

impl<Q, S> fmt::Display for QueueSubscription<Q, S>
where
    Q: TransactionQueue,
    S: Subscriber<Input = Vec<Q::Transaction>, Failure = Q::Error>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("payment queue observer")
    }
}

impl<Q, S> fmt::Debug for QueueSubscription<Q, S>
where
    Q: TransactionQueue,
    S: Subscriber<Input = Vec<Q::Transaction>, Failure = Q::Error>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueSubscription")
            .field("state", &self.snapshot())
            .finish()
    }
}
