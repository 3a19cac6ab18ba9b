// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Async [`Stream`] view of any publisher.
//!
//! The adapter subscribes with a fixed window of demand (its capacity) and forwards
//! every delivery into a channel. Each batch the stream yields grants one more unit,
//! so at most `capacity` batches are ever buffered; while the consumer lags, further
//! arrivals meet exhausted demand and are handled by the publisher's
//! [`OverflowPolicy`](crate::OverflowPolicy).
//!
//! Batches arrive as [`StreamItem::Batch`]; a source failure arrives as one
//! [`StreamItem::Failed`] and ends the stream, as does normal completion. Dropping
//! the stream cancels the subscription.
//!
//! # Example
//!
//! ```
//! use futures::StreamExt;
//! use pushpull::{make_updates_stream, IntoBridgeStream};
//! use pushpull_test_utils::{FakePaymentQueue, Transaction};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let queue = Arc::new(FakePaymentQueue::new());
//! let mut updates = make_updates_stream(&queue).into_stream();
//!
//! queue.update(vec![Transaction::purchasing(1, "coins")]);
//!
//! let batch = updates.next().await.unwrap().into_result().unwrap();
//! assert_eq!(batch[0].id, 1);
//! # }
//! ```

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use pushpull_core::{Completion, Demand, Publisher, StreamItem, Subscriber, Subscription};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Batches buffered by [`IntoBridgeStream::into_stream`] before arrivals overflow.
pub const DEFAULT_STREAM_CAPACITY: usize = 64;

/// Stream of items delivered by one bridge subscription.
pub struct BridgeStream<T> {
    receiver: UnboundedReceiver<StreamItem<T>>,
    subscription: Arc<dyn Subscription>,
}

impl<T> BridgeStream<T> {
    /// Handle of the underlying subscription.
    pub fn subscription(&self) -> &Arc<dyn Subscription> {
        &self.subscription
    }
}

impl<T> Stream for BridgeStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let polled = Pin::new(&mut self.receiver).poll_next(cx);
        if let Poll::Ready(Some(StreamItem::Batch(_))) = &polled {
            // The slot this batch occupied is free again
            self.subscription.request(Demand::max(1));
        }
        polled
    }
}

impl<T> Drop for BridgeStream<T> {
    fn drop(&mut self) {
        self.subscription.cancel();
    }
}

struct ChannelSubscriber<T, E> {
    sender: UnboundedSender<StreamItem<T>>,
    window: Demand,
    _failure: core::marker::PhantomData<fn(E)>,
}

impl<T, E> Subscriber for ChannelSubscriber<T, E>
where
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    type Input = T;
    type Failure = E;

    fn receive_subscription(&self, subscription: Arc<dyn Subscription>) {
        subscription.request(self.window);
    }

    fn receive(&self, input: T) -> Demand {
        // The stream may already be gone; its drop cancels the subscription.
        let _ = self.sender.unbounded_send(StreamItem::Batch(input));
        Demand::NONE
    }

    fn receive_completion(&self, completion: Completion<E>) {
        if let Completion::Failure(error) = completion {
            let _ = self.sender.unbounded_send(StreamItem::failure(error));
        }
        self.sender.close_channel();
    }
}

/// Converts a publisher into an async stream of its deliveries.
pub trait IntoBridgeStream: Publisher + Sized {
    /// Streams with [`DEFAULT_STREAM_CAPACITY`].
    fn into_stream(self) -> BridgeStream<Self::Output> {
        self.into_stream_with_capacity(DEFAULT_STREAM_CAPACITY)
    }

    /// Streams with room for `capacity` undelivered batches (at least one).
    fn into_stream_with_capacity(self, capacity: usize) -> BridgeStream<Self::Output>;
}

impl<P> IntoBridgeStream for P
where
    P: Publisher,
    P::Failure: std::error::Error + Sync,
{
    fn into_stream_with_capacity(self, capacity: usize) -> BridgeStream<Self::Output> {
        let (sender, receiver) = mpsc::unbounded();
        let window = Demand::max(capacity.max(1) as u64);
        let subscription = self.subscribe(ChannelSubscriber::<P::Output, P::Failure> {
            sender,
            window,
            _failure: core::marker::PhantomData,
        });

        BridgeStream {
            receiver,
            subscription,
        }
    }
}
