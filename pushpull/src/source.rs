// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Callback sources the bridge attaches to.
//!
//! These traits describe push-based platform objects only at the boundary the
//! bridge needs. Payloads are opaque: the bridge never inspects a transaction or a
//! response.
//!
//! Sources may invoke observers and delegates from any thread, concurrently, and
//! even from inside the registration call itself.

use std::collections::HashSet;
use std::sync::{Arc, Weak};

/// A long-lived queue that reports transaction changes to any number of observers.
pub trait TransactionQueue: Send + Sync + 'static {
    /// Opaque transaction record.
    type Transaction: Clone + Send + Sync + 'static;
    /// Opaque download record.
    type Download: Send + Sync + 'static;
    /// Failure reported when restoring completed transactions fails.
    type Error: Clone + std::error::Error + Send + Sync + 'static;

    /// Starts notifying `observer`.
    fn add_observer(&self, observer: Arc<dyn TransactionObserver<Self>>);

    /// Stops notifying the observer identical to `observer`. Unknown observers are ignored.
    fn remove_observer(&self, observer: &Arc<dyn TransactionObserver<Self>>);
}

/// Observer interface of a [`TransactionQueue`].
pub trait TransactionObserver<Q: TransactionQueue + ?Sized>: Send + Sync {
    /// Transactions were added or changed state.
    fn updated_transactions(&self, transactions: &[Q::Transaction]);

    /// Transactions were removed from the queue.
    fn removed_transactions(&self, _transactions: &[Q::Transaction]) {}

    /// Restoring completed transactions failed.
    fn restore_failed(&self, error: &Q::Error);

    /// Restoring completed transactions finished.
    fn restore_finished(&self) {}

    /// Hosted downloads made progress.
    fn updated_downloads(&self, _downloads: &[Q::Download]) {}

    /// The storefront changed.
    fn storefront_changed(&self) {}
}

/// A one-shot request that answers its delegate exactly once.
pub trait ProductRequest: Send + Sync + 'static {
    /// Opaque response record.
    type Response: Send + 'static;
    /// Failure reported instead of a response.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Replaces the delegate. The request only holds it weakly.
    fn set_delegate(&self, delegate: Option<Weak<dyn RequestDelegate<Self>>>);

    /// Sends the request.
    fn start(&self);

    /// Abandons the request. No delegate call follows.
    fn cancel(&self);
}

/// Delegate interface of a [`ProductRequest`].
pub trait RequestDelegate<R: ProductRequest + ?Sized>: Send + Sync {
    /// The request produced its response.
    fn did_receive(&self, response: R::Response);

    /// The request failed.
    fn did_fail(&self, error: R::Error);
}

/// Requests that can be built from a set of product identifiers.
pub trait FromProductIdentifiers: ProductRequest + Sized {
    fn from_product_identifiers(identifiers: HashSet<String>) -> Self;
}
