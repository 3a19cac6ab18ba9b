// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Source registration adapter.
//!
//! Translates a source's observer or delegate interface into plain callbacks and
//! keeps the handle needed to detach again. The adapter holds no synchronization
//! state of its own; the owning subscription decides when a registration is
//! released, and releases it exactly once by value.
//!
//! Callbacks may fire before [`register`] returns. Subscriptions are fully set up
//! before registering, so such early callbacks are processed normally.

use crate::source::{ProductRequest, RequestDelegate, TransactionObserver, TransactionQueue};
use std::sync::{Arc, Weak};

/// Callback for one batch of transactions.
pub type BatchCallback<T> = Box<dyn Fn(Vec<T>) + Send + Sync>;

/// Callback for a terminal source failure.
pub type FailureCallback<E> = Box<dyn Fn(E) + Send + Sync>;

/// Why a registration is being released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Release {
    /// The subscription was cancelled or torn down while still active.
    Cancelled,
    /// The subscription reached a terminal event.
    Finished,
}

/// A live attachment to a source.
pub(crate) trait Registration: Send {
    fn release(self, reason: Release);
}

/// Observer that forwards queue notifications to up to three callbacks.
///
/// A missing batch callback means that channel is ignored. Download progress,
/// restore completion and storefront changes are always ignored.
pub struct CallbackObserver<T, E> {
    on_updated: Option<BatchCallback<T>>,
    on_removed: Option<BatchCallback<T>>,
    on_failure: FailureCallback<E>,
}

impl<T, E> CallbackObserver<T, E> {
    pub fn new(
        on_updated: Option<BatchCallback<T>>,
        on_removed: Option<BatchCallback<T>>,
        on_failure: FailureCallback<E>,
    ) -> Self {
        Self {
            on_updated,
            on_removed,
            on_failure,
        }
    }
}

impl<Q: TransactionQueue> TransactionObserver<Q> for CallbackObserver<Q::Transaction, Q::Error> {
    fn updated_transactions(&self, transactions: &[Q::Transaction]) {
        if let Some(callback) = &self.on_updated {
            callback(transactions.to_vec());
        }
    }

    fn removed_transactions(&self, transactions: &[Q::Transaction]) {
        if let Some(callback) = &self.on_removed {
            callback(transactions.to_vec());
        }
    }

    fn restore_failed(&self, error: &Q::Error) {
        (self.on_failure)(error.clone());
    }
}

/// Attaches the three callbacks to `queue` and returns the handle to detach them.
pub fn register<Q: TransactionQueue>(
    queue: &Arc<Q>,
    on_updated: Option<BatchCallback<Q::Transaction>>,
    on_removed: Option<BatchCallback<Q::Transaction>>,
    on_failure: FailureCallback<Q::Error>,
) -> QueueRegistration<Q> {
    let observer: Arc<dyn TransactionObserver<Q>> =
        Arc::new(CallbackObserver::new(on_updated, on_removed, on_failure));
    queue.add_observer(Arc::clone(&observer));
    debug!("registered payment queue observer");

    QueueRegistration {
        queue: Arc::downgrade(queue),
        observer,
    }
}

/// Detaches a queue registration. A no-op when the queue is already gone.
pub fn deregister<Q: TransactionQueue>(registration: QueueRegistration<Q>) {
    match registration.queue.upgrade() {
        Some(queue) => {
            queue.remove_observer(&registration.observer);
            debug!("deregistered payment queue observer");
        }
        None => trace!("payment queue released before deregistration"),
    }
}

/// Handle of an observer attached to a [`TransactionQueue`].
pub struct QueueRegistration<Q: TransactionQueue> {
    queue: Weak<Q>,
    observer: Arc<dyn TransactionObserver<Q>>,
}

impl<Q: TransactionQueue> Registration for QueueRegistration<Q> {
    fn release(self, _reason: Release) {
        deregister(self);
    }
}

/// Delegate slot held on a started [`ProductRequest`].
pub(crate) struct RequestRegistration<R: ProductRequest> {
    request: Arc<R>,
}

impl<R: ProductRequest> RequestRegistration<R> {
    pub(crate) fn register(request: &Arc<R>, delegate: Weak<dyn RequestDelegate<R>>) -> Self {
        request.set_delegate(Some(delegate));
        debug!("registered product request delegate");
        Self {
            request: Arc::clone(request),
        }
    }
}

impl<R: ProductRequest> Registration for RequestRegistration<R> {
    fn release(self, reason: Release) {
        self.request.set_delegate(None);
        if reason == Release::Cancelled {
            self.request.cancel();
            debug!("cancelled product request");
        }
    }
}
