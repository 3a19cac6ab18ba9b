// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared state machine behind every bridge subscription.
//!
//! Two locks with a fixed order:
//!
//! - `state` (non-reentrant) guards demand, lifecycle, the registration and the held
//!   batch. It is never held while calling into the subscriber or the source.
//! - `downstream` (reentrant) serializes calls into the subscriber and owns it. The
//!   delivering thread may re-enter through `request`/`cancel`, or through a source
//!   callback the subscriber triggers synchronously.
//!
//! `state` may be taken while `downstream` is held, never the other way round.
//! Demand is claimed with `downstream` already held, so batches reach the
//! subscriber in the order their demand was claimed.
//!
//! The subscriber is dropped as soon as the subscription ends, which breaks the
//! cycle formed by a subscriber that keeps its subscription handle.

use crate::config::{BridgeConfig, OverflowPolicy};
use crate::kind::StreamKind;
use crate::registration::{Registration, Release};
use crate::snapshot::{BridgeSnapshot, Lifecycle};
use core::cell::{Cell, RefCell};
use pushpull_core::bridge_mutex::{Mutex, MutexGuard, ReentrantMutex};
use pushpull_core::{Completion, Demand, Subscriber, Subscription};
use std::sync::Arc;

/// How many values a subscription delivers before it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cardinality {
    /// Any number of values; only a source failure or cancellation ends it.
    Continuous,
    /// One value, immediately followed by completion.
    Single,
}

struct State<T, R> {
    demand: Demand,
    lifecycle: Lifecycle,
    registration: Option<R>,
    pending: Option<T>,
}

impl<T, R> State<T, R> {
    fn finish(&mut self, lifecycle: Lifecycle) -> Option<R> {
        self.lifecycle = lifecycle;
        self.pending = None;
        self.registration.take()
    }
}

struct Downstream<S> {
    subscriber: RefCell<Option<S>>,
    // Set when the terminal event goes out
    finished: Cell<bool>,
}

impl<S> Downstream<S> {
    fn with<T>(&self, call: impl FnOnce(&S) -> T) -> Option<T> {
        self.subscriber.borrow().as_ref().map(call)
    }

    /// Takes the subscriber out, unless a call into it is still running on this
    /// thread. That call's caller detaches it once it returns.
    fn detach(&self) -> Option<S> {
        self.subscriber
            .try_borrow_mut()
            .ok()
            .and_then(|mut slot| slot.take())
    }
}

pub(crate) struct Bridge<S: Subscriber, R: Registration> {
    kind: StreamKind,
    cardinality: Cardinality,
    overflow: OverflowPolicy,
    state: Mutex<State<S::Input, R>>,
    downstream: ReentrantMutex<Downstream<S>>,
}

impl<S: Subscriber, R: Registration> Bridge<S, R> {
    pub(crate) fn new(
        kind: StreamKind,
        cardinality: Cardinality,
        config: &BridgeConfig,
        subscriber: S,
    ) -> Self {
        let demand = config.initial_demand().unwrap_or(match cardinality {
            Cardinality::Continuous => Demand::NONE,
            Cardinality::Single => Demand::max(1),
        });

        Self {
            kind,
            cardinality,
            overflow: config.overflow(),
            state: Mutex::new(State {
                demand,
                lifecycle: Lifecycle::Active,
                registration: None,
                pending: None,
            }),
            downstream: ReentrantMutex::new(Downstream {
                subscriber: RefCell::new(Some(subscriber)),
                finished: Cell::new(false),
            }),
        }
    }

    /// Hands the subscriber its subscription handle. Must precede registration.
    pub(crate) fn open(&self, subscription: Arc<dyn Subscription>) {
        let detached = {
            let downstream = self.downstream.lock();
            downstream.with(|subscriber| subscriber.receive_subscription(subscription));
            if self.is_active() {
                None
            } else {
                downstream.detach()
            }
        };
        drop(detached);
    }

    pub(crate) fn is_active(&self) -> bool {
        self.state.lock().lifecycle.is_active()
    }

    /// Stores the source registration.
    ///
    /// If the subscription left `Active` while registering (a cancel, or a failure
    /// reported from inside the registration call), the registration is released
    /// right away instead.
    pub(crate) fn install(&self, registration: R) {
        let mut state = self.state.lock();
        let reason = match state.lifecycle {
            Lifecycle::Active => {
                state.registration = Some(registration);
                return;
            }
            Lifecycle::Cancelled => Release::Cancelled,
            Lifecycle::Completed | Lifecycle::Failed => Release::Finished,
        };
        drop(state);

        trace!(kind = %self.kind, "subscription ended while registering");
        registration.release(reason);
    }

    pub(crate) fn request(&self, demand: Demand) {
        {
            let mut state = self.state.lock();
            if !state.lifecycle.is_active() {
                return;
            }
            state.demand += demand;
            if state.pending.is_none() {
                return;
            }
        }

        let downstream = self.downstream.lock();
        let held = {
            let mut state = self.state.lock();
            if state.lifecycle.is_active() && state.pending.is_some() && state.demand.consume_one()
            {
                state.pending.take()
            } else {
                None
            }
        };

        if let Some(batch) = held {
            trace!(kind = %self.kind, "delivering held batch");
            self.dispatch(&downstream, batch);
        }
    }

    /// Entry point for a source callback carrying one batch tagged with its channel.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is not the kind this subscription was built for. That means
    /// the registration wired a callback to the wrong channel.
    pub(crate) fn receive_batch(&self, batch: S::Input, tag: StreamKind) {
        {
            let state = self.state.lock();
            if tag != self.kind {
                panic!("expected {} batch, got {} instead", self.kind, tag);
            }
            if !state.lifecycle.is_active() {
                trace!(kind = %self.kind, lifecycle = %state.lifecycle, "ignoring late batch");
                return;
            }
            if !state.demand.has_demand() {
                self.overflow(state, batch);
                return;
            }
        }

        let downstream = self.downstream.lock();
        let mut state = self.state.lock();
        if !state.lifecycle.is_active() {
            return;
        }
        if state.demand.consume_one() {
            drop(state);
            self.dispatch(&downstream, batch);
        } else {
            // Another callback claimed the last unit first
            self.overflow(state, batch);
        }
    }

    /// Entry point for a source callback reporting a terminal failure.
    pub(crate) fn fail(&self, error: S::Failure) {
        let registration = {
            let mut state = self.state.lock();
            if !state.lifecycle.is_active() {
                trace!(kind = %self.kind, lifecycle = %state.lifecycle, "ignoring late failure");
                return;
            }
            let _ = state.demand.consume_one();
            state.finish(Lifecycle::Failed)
        };

        debug!(kind = %self.kind, "source reported failure");
        self.terminate(registration, None, Completion::Failure(error));
    }

    pub(crate) fn cancel(&self) {
        let registration = {
            let mut state = self.state.lock();
            if !state.lifecycle.is_active() {
                return;
            }
            state.finish(Lifecycle::Cancelled)
        };

        debug!(kind = %self.kind, "subscription cancelled");
        if let Some(registration) = registration {
            registration.release(Release::Cancelled);
        }

        // Waits for a delivery running on another thread
        let detached = self.downstream.lock().detach();
        drop(detached);
    }

    pub(crate) fn snapshot(&self) -> BridgeSnapshot {
        let state = self.state.lock();
        BridgeSnapshot {
            kind: self.kind,
            lifecycle: state.lifecycle,
            demand: state.demand,
            registered: state.registration.is_some(),
            pending: state.pending.is_some(),
        }
    }

    // No demand for `batch`: apply the overflow policy.
    fn overflow(&self, mut state: MutexGuard<'_, State<S::Input, R>>, batch: S::Input) {
        match (self.overflow, self.cardinality) {
            (OverflowPolicy::KeepLatest, _) => {
                if state.pending.replace(batch).is_some() {
                    debug!(kind = %self.kind, "replaced held batch: no outstanding demand");
                }
            }
            (OverflowPolicy::DropNewest, Cardinality::Continuous) => {
                debug!(kind = %self.kind, "dropping batch: no outstanding demand");
            }
            (OverflowPolicy::DropNewest, Cardinality::Single) => {
                let registration = state.finish(Lifecycle::Completed);
                drop(state);
                debug!(kind = %self.kind, "dropping response: no outstanding demand");
                self.terminate(registration, None, Completion::Finished);
            }
        }
    }

    // Demand for `batch` has already been claimed under `downstream`.
    fn dispatch(&self, downstream: &Downstream<S>, batch: S::Input) {
        match self.cardinality {
            Cardinality::Continuous => self.deliver(downstream, batch),
            Cardinality::Single => {
                let registration = {
                    let mut state = self.state.lock();
                    if !state.lifecycle.is_active() {
                        return;
                    }
                    state.finish(Lifecycle::Completed)
                };
                self.terminate(registration, Some(batch), Completion::Finished);
            }
        }
    }

    fn deliver(&self, downstream: &Downstream<S>, batch: S::Input) {
        // A cancel or failure may have landed after demand was claimed
        if downstream.finished.get() || !self.is_active() {
            trace!(kind = %self.kind, "skipping delivery: subscription ended");
            return;
        }

        let additional = downstream
            .with(|subscriber| subscriber.receive(batch))
            .unwrap_or(Demand::NONE);
        if additional.has_demand() {
            self.request(additional);
        }

        // The subscriber may have ended the subscription from inside `receive`
        if downstream.finished.get() || !self.is_active() {
            drop(downstream.detach());
        }
    }

    fn terminate(
        &self,
        registration: Option<R>,
        last: Option<S::Input>,
        completion: Completion<S::Failure>,
    ) {
        if let Some(registration) = registration {
            registration.release(Release::Finished);
        }

        let detached = {
            let downstream = self.downstream.lock();
            if downstream.finished.replace(true) {
                return;
            }
            downstream.with(|subscriber| {
                if let Some(value) = last {
                    let _ = subscriber.receive(value);
                }
                subscriber.receive_completion(completion);
            });
            downstream.detach()
        };
        drop(detached);
    }
}

impl<S: Subscriber, R: Registration> Drop for Bridge<S, R> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if !state.lifecycle.is_active() {
            return;
        }
        if let Some(registration) = state.finish(Lifecycle::Cancelled) {
            trace!(kind = %self.kind, "releasing registration on teardown");
            registration.release(Release::Cancelled);
        }
    }
}
