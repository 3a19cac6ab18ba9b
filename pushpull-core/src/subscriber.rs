// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Demand-driven consumer contract.
//!
//! The contract follows the reactive-streams family:
//!
//! 1. A [`Publisher`] hands each new [`Subscriber`] a [`Subscription`] through
//!    [`Subscriber::receive_subscription`] before anything else.
//! 2. The subscriber grants demand with [`Subscription::request`], or by returning
//!    additional [`Demand`] from [`Subscriber::receive`].
//! 3. At most one terminal [`Completion`] is delivered. Nothing follows it.
//!
//! Calls into a subscriber never overlap for a single subscription, but they may
//! arrive on any thread. A subscriber may call back into its subscription from
//! inside any of these methods.

use crate::Demand;
use std::sync::Arc;

/// Terminal event of a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<E> {
    /// The source finished normally.
    Finished,
    /// The source reported a failure.
    Failure(E),
}

impl<E> Completion<E> {
    /// Returns `true` for [`Completion::Finished`].
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Returns `true` for [`Completion::Failure`].
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// Handle a subscriber uses to regulate and stop a subscription.
pub trait Subscription: Send + Sync {
    /// Grants `demand` further deliveries. Saturates at [`Demand::UNLIMITED`].
    fn request(&self, demand: Demand);

    /// Stops the subscription. Idempotent, and safe to race with deliveries.
    fn cancel(&self);
}

/// Downstream consumer of a publisher.
pub trait Subscriber: Send + Sync + 'static {
    /// Delivered value type.
    type Input: Send + 'static;
    /// Failure type carried by [`Completion::Failure`].
    type Failure: Send + 'static;

    /// Called once, before any value, with the handle for this subscription.
    fn receive_subscription(&self, subscription: Arc<dyn Subscription>);

    /// Called for each delivered value. Returns demand granted on top of what is
    /// already outstanding.
    fn receive(&self, input: Self::Input) -> Demand;

    /// Called at most once when the subscription terminates.
    fn receive_completion(&self, completion: Completion<Self::Failure>);
}

/// Factory of independent subscriptions.
pub trait Publisher {
    /// Value type delivered to subscribers.
    type Output: Send + 'static;
    /// Failure type delivered to subscribers.
    type Failure: Send + 'static;

    /// Attaches `subscriber` through a new subscription and returns the handle.
    fn subscribe<S>(&self, subscriber: S) -> Arc<dyn Subscription>
    where
        S: Subscriber<Input = Self::Output, Failure = Self::Failure>;
}
