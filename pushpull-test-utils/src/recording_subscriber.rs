// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A [`Subscriber`] that records everything it is told.
//!
//! Clones share the same recording, so a test keeps one clone and hands the other to
//! the publisher.

use parking_lot::Mutex;
use pushpull_core::{Completion, Demand, Subscriber, Subscription};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

type ValueHook = Box<dyn Fn(&Arc<dyn Subscription>) + Send + Sync>;

/// One call observed by a [`RecordingSubscriber`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event<T, E> {
    Subscribed,
    Value(T),
    Finished,
    Failed(E),
}

struct Recording<T, E> {
    events: Mutex<Vec<Event<T, E>>>,
    subscription: Mutex<Option<Arc<dyn Subscription>>>,
    initial_demand: Demand,
    demand_per_value: Demand,
    delay: Option<Duration>,
    on_value: Option<ValueHook>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

pub struct RecordingSubscriber<T, E> {
    recording: Arc<Recording<T, E>>,
}

impl<T, E> Clone for RecordingSubscriber<T, E> {
    fn clone(&self) -> Self {
        Self {
            recording: Arc::clone(&self.recording),
        }
    }
}

impl<T, E> Default for RecordingSubscriber<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> RecordingSubscriber<T, E> {
    /// Requests nothing and grants no demand per value.
    pub fn new() -> Self {
        Self {
            recording: Arc::new(Recording {
                events: Mutex::new(Vec::new()),
                subscription: Mutex::new(None),
                initial_demand: Demand::NONE,
                demand_per_value: Demand::NONE,
                delay: None,
                on_value: None,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }),
        }
    }

    /// Demand requested from inside `receive_subscription`. Must be set before subscribing.
    pub fn with_initial_demand(self, demand: Demand) -> Self {
        self.configure(|recording| recording.initial_demand = demand)
    }

    /// Demand returned from every `receive`.
    pub fn with_demand_per_value(self, demand: Demand) -> Self {
        self.configure(|recording| recording.demand_per_value = demand)
    }

    /// Time spent inside every `receive`, to widen race windows.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.configure(|recording| recording.delay = Some(delay))
    }

    /// Runs `hook` inside every `receive`, after the value is recorded.
    pub fn on_value(self, hook: impl Fn(&Arc<dyn Subscription>) + Send + Sync + 'static) -> Self {
        self.configure(|recording| recording.on_value = Some(Box::new(hook)))
    }

    fn configure(self, apply: impl FnOnce(&mut Recording<T, E>)) -> Self {
        let mut recording = Arc::try_unwrap(self.recording)
            .unwrap_or_else(|_| panic!("configure a RecordingSubscriber before cloning it"));
        apply(&mut recording);
        Self {
            recording: Arc::new(recording),
        }
    }

    pub fn events(&self) -> Vec<Event<T, E>>
    where
        T: Clone,
        E: Clone,
    {
        self.recording.events.lock().clone()
    }

    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.recording
            .events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Value(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of terminal events received.
    pub fn completions(&self) -> usize {
        self.recording
            .events
            .lock()
            .iter()
            .filter(|event| matches!(event, Event::Finished | Event::Failed(_)))
            .count()
    }

    /// The subscription handle, until a terminal event releases it.
    pub fn subscription(&self) -> Option<Arc<dyn Subscription>> {
        self.recording.subscription.lock().clone()
    }

    pub fn request(&self, demand: Demand) {
        if let Some(subscription) = self.subscription() {
            subscription.request(demand);
        }
    }

    pub fn cancel(&self) {
        if let Some(subscription) = self.subscription() {
            subscription.cancel();
        }
    }

    /// Most deliveries observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.recording.max_in_flight.load(Ordering::SeqCst)
    }
}

impl<T, E> Subscriber for RecordingSubscriber<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    type Input = T;
    type Failure = E;

    fn receive_subscription(&self, subscription: Arc<dyn Subscription>) {
        self.recording.events.lock().push(Event::Subscribed);
        *self.recording.subscription.lock() = Some(Arc::clone(&subscription));
        if self.recording.initial_demand.has_demand() {
            subscription.request(self.recording.initial_demand);
        }
    }

    fn receive(&self, input: T) -> Demand {
        let recording = &self.recording;
        let running = recording.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        recording.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = recording.delay {
            std::thread::sleep(delay);
        }

        recording.events.lock().push(Event::Value(input));
        if let Some(hook) = &recording.on_value {
            // Hooks may re-enter the subscription, so no lock is held here
            if let Some(subscription) = self.subscription() {
                hook(&subscription);
            }
        }

        recording.in_flight.fetch_sub(1, Ordering::SeqCst);
        recording.demand_per_value
    }

    fn receive_completion(&self, completion: Completion<E>) {
        let event = match completion {
            Completion::Finished => Event::Finished,
            Completion::Failure(error) => Event::Failed(error),
        };
        self.recording.events.lock().push(event);
        self.recording.subscription.lock().take();
    }
}
