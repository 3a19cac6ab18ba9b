// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # pushpull
//!
//! Bridges callback-driven sources into demand-regulated subscriptions.
//!
//! A source calls back at its own pace on threads it controls. The bridge registers
//! with it once per subscription, delivers at most as many batches as the subscriber
//! has asked for, serializes deliveries, and leaves the source exactly once when the
//! subscription is cancelled, fails, completes or is dropped.
//!
//! Two instances are provided:
//!
//! - [`make_updates_stream`] / [`make_deletions_stream`]: continuous streams of
//!   transaction batches from a [`TransactionQueue`]
//! - [`make_one_shot_stream`]: the single response of a [`ProductRequest`]
//!
//! Any publisher can also be consumed as an async stream with
//! [`IntoBridgeStream::into_stream`].
//!
//! ## Backpressure
//!
//! Batches are never split or merged. A batch that arrives without outstanding demand
//! is dropped by default; [`OverflowPolicy::KeepLatest`] holds the most recent one
//! until demand is granted instead.
//!
//! ## Quick Start
//!
//! ```
//! use pushpull::make_updates_stream;
//! use pushpull_core::Demand;
//! use pushpull_test_utils::{FakePaymentQueue, QueueRecorder, Transaction};
//! use std::sync::Arc;
//!
//! let queue = Arc::new(FakePaymentQueue::new());
//! let subscriber = QueueRecorder::new().with_initial_demand(Demand::max(1));
//! let _subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());
//!
//! queue.update(vec![Transaction::purchasing(1, "coins")]);
//! queue.update(vec![Transaction::purchasing(2, "gems")]); // no demand left: dropped
//!
//! assert_eq!(subscriber.values().len(), 1);
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

mod bridge;
pub mod config;
pub mod kind;
pub mod publisher;
pub mod queue_subscription;
pub mod registration;
pub mod request_subscription;
pub mod snapshot;
pub mod source;
pub mod stream;

pub use self::config::{BridgeConfig, OverflowPolicy};
pub use self::kind::{QueueChannel, StreamKind};
pub use self::publisher::{
    make_deletions_stream, make_one_shot_stream, make_updates_stream, PaymentQueueExt,
    PaymentQueuePublisher, ProductRequestExt, ProductRequestPublisher,
};
pub use self::queue_subscription::QueueSubscription;
pub use self::request_subscription::RequestSubscription;
pub use self::snapshot::{BridgeSnapshot, Lifecycle};
pub use self::source::{
    FromProductIdentifiers, ProductRequest, RequestDelegate, TransactionObserver,
    TransactionQueue,
};
pub use self::stream::{BridgeStream, IntoBridgeStream, DEFAULT_STREAM_CAPACITY};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        make_deletions_stream, make_one_shot_stream, make_updates_stream, BridgeConfig,
        IntoBridgeStream, OverflowPolicy, PaymentQueueExt, ProductRequestExt,
    };
    pub use pushpull_core::{Completion, Demand, Publisher, Subscriber, Subscription};
}
