// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Publishers: immutable (source, kind) pairs that build one subscription per subscriber.
//!
//! Two publishers are equal when they wrap the identical source instance and the same
//! [`StreamKind`]. Configuration does not take part in equality.
//!
//! # Example
//!
//! ```
//! use pushpull::{make_deletions_stream, make_updates_stream};
//! use pushpull_test_utils::FakePaymentQueue;
//! use std::sync::Arc;
//!
//! let queue = Arc::new(FakePaymentQueue::new());
//! let other = Arc::new(FakePaymentQueue::new());
//!
//! assert_eq!(make_updates_stream(&queue), make_updates_stream(&queue));
//! assert_ne!(make_updates_stream(&queue), make_deletions_stream(&queue));
//! assert_ne!(make_updates_stream(&queue), make_updates_stream(&other));
//! ```

use crate::config::BridgeConfig;
use crate::kind::{QueueChannel, StreamKind};
use crate::queue_subscription::QueueSubscription;
use crate::request_subscription::RequestSubscription;
use crate::source::{FromProductIdentifiers, ProductRequest, TransactionQueue};
use core::fmt;
use pushpull_core::{Publisher, Subscriber, Subscription};
use std::collections::HashSet;
use std::sync::Arc;

/// Publisher of transaction batches from one channel of a payment queue.
pub struct PaymentQueuePublisher<Q: TransactionQueue> {
    queue: Arc<Q>,
    channel: QueueChannel,
    config: BridgeConfig,
}

impl<Q: TransactionQueue> PaymentQueuePublisher<Q> {
    /// Publishes updated transactions.
    #[must_use]
    pub fn new(queue: Arc<Q>) -> Self {
        Self::updates(queue)
    }

    #[must_use]
    pub fn updates(queue: Arc<Q>) -> Self {
        Self::with_channel(queue, QueueChannel::Updates)
    }

    #[must_use]
    pub fn deletions(queue: Arc<Q>) -> Self {
        Self::with_channel(queue, QueueChannel::Deletions)
    }

    fn with_channel(queue: Arc<Q>, channel: QueueChannel) -> Self {
        Self {
            queue,
            channel,
            config: BridgeConfig::default(),
        }
    }

    /// Settings copied into every subscription made from now on.
    #[must_use]
    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn kind(&self) -> StreamKind {
        self.channel.into()
    }

    pub fn queue(&self) -> &Arc<Q> {
        &self.queue
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Builds a subscription, hands it to `subscriber` and registers it on the queue.
    pub fn make_subscription<S>(&self, subscriber: S) -> Arc<QueueSubscription<Q, S>>
    where
        S: Subscriber<Input = Vec<Q::Transaction>, Failure = Q::Error>,
    {
        QueueSubscription::attach(&self.queue, self.channel, &self.config, subscriber)
    }
}

impl<Q: TransactionQueue> Publisher for PaymentQueuePublisher<Q> {
    type Output = Vec<Q::Transaction>;
    type Failure = Q::Error;

    fn subscribe<S>(&self, subscriber: S) -> Arc<dyn Subscription>
    where
        S: Subscriber<Input = Self::Output, Failure = Self::Failure>,
    {
        self.make_subscription(subscriber)
    }
}

impl<Q: TransactionQueue> Clone for PaymentQueuePublisher<Q> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
            channel: self.channel,
            config: self.config,
        }
    }
}

impl<Q: TransactionQueue> PartialEq for PaymentQueuePublisher<Q> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.queue, &other.queue) && self.channel == other.channel
    }
}

impl<Q: TransactionQueue> Eq for PaymentQueuePublisher<Q> {}

impl<Q: TransactionQueue> fmt::Debug for PaymentQueuePublisher<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentQueuePublisher")
            .field("queue", &Arc::as_ptr(&self.queue))
            .field("kind", &self.kind())
            .field("config", &self.config)
            .finish()
    }
}

/// Publisher of the single response of a product request.
pub struct ProductRequestPublisher<R: ProductRequest> {
    request: Arc<R>,
    config: BridgeConfig,
}

impl<R: ProductRequest> ProductRequestPublisher<R> {
    #[must_use]
    pub fn new(request: Arc<R>) -> Self {
        Self {
            request,
            config: BridgeConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn kind(&self) -> StreamKind {
        StreamKind::Response
    }

    pub fn request(&self) -> &Arc<R> {
        &self.request
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Builds a subscription, hands it to `subscriber`, installs it as the request's
    /// delegate and starts the request.
    ///
    /// The request answers only once: subscribing a second time to the same publisher
    /// replaces the delegate of a request that may already be running.
    pub fn make_subscription<S>(&self, subscriber: S) -> Arc<RequestSubscription<R, S>>
    where
        S: Subscriber<Input = R::Response, Failure = R::Error>,
    {
        RequestSubscription::attach(&self.request, &self.config, subscriber)
    }
}

impl<R: FromProductIdentifiers> ProductRequestPublisher<R> {
    /// Creates a fresh request for `identifiers` and publishes its response.
    #[must_use]
    pub fn for_identifiers<I>(identifiers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let identifiers: HashSet<String> = identifiers.into_iter().map(Into::into).collect();
        Self::new(Arc::new(R::from_product_identifiers(identifiers)))
    }
}

impl<R: ProductRequest> Publisher for ProductRequestPublisher<R> {
    type Output = R::Response;
    type Failure = R::Error;

    fn subscribe<S>(&self, subscriber: S) -> Arc<dyn Subscription>
    where
        S: Subscriber<Input = Self::Output, Failure = Self::Failure>,
    {
        self.make_subscription(subscriber)
    }
}

impl<R: ProductRequest> Clone for ProductRequestPublisher<R> {
    fn clone(&self) -> Self {
        Self {
            request: Arc::clone(&self.request),
            config: self.config,
        }
    }
}

impl<R: ProductRequest> PartialEq for ProductRequestPublisher<R> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.request, &other.request)
    }
}

impl<R: ProductRequest> Eq for ProductRequestPublisher<R> {}

impl<R: ProductRequest> fmt::Debug for ProductRequestPublisher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductRequestPublisher")
            .field("request", &Arc::as_ptr(&self.request))
            .field("kind", &self.kind())
            .field("config", &self.config)
            .finish()
    }
}

/// Publisher of updated transactions on `queue`.
pub fn make_updates_stream<Q: TransactionQueue>(queue: &Arc<Q>) -> PaymentQueuePublisher<Q> {
    PaymentQueuePublisher::updates(Arc::clone(queue))
}

/// Publisher of removed transactions on `queue`.
pub fn make_deletions_stream<Q: TransactionQueue>(queue: &Arc<Q>) -> PaymentQueuePublisher<Q> {
    PaymentQueuePublisher::deletions(Arc::clone(queue))
}

/// Publisher of the single response of `request`.
pub fn make_one_shot_stream<R: ProductRequest>(request: &Arc<R>) -> ProductRequestPublisher<R> {
    ProductRequestPublisher::new(Arc::clone(request))
}

/// Publisher accessors on a shared payment queue.
pub trait PaymentQueueExt<Q: TransactionQueue> {
    fn updated_transactions_publisher(&self) -> PaymentQueuePublisher<Q>;
    fn removed_transactions_publisher(&self) -> PaymentQueuePublisher<Q>;
}

impl<Q: TransactionQueue> PaymentQueueExt<Q> for Arc<Q> {
    fn updated_transactions_publisher(&self) -> PaymentQueuePublisher<Q> {
        make_updates_stream(self)
    }

    fn removed_transactions_publisher(&self) -> PaymentQueuePublisher<Q> {
        make_deletions_stream(self)
    }
}

/// Publisher accessor on a shared product request.
pub trait ProductRequestExt<R: ProductRequest> {
    fn publisher(&self) -> ProductRequestPublisher<R>;
}

impl<R: ProductRequest> ProductRequestExt<R> for Arc<R> {
    fn publisher(&self) -> ProductRequestPublisher<R> {
        make_one_shot_stream(self)
    }
}
