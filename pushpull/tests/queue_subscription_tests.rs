// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pushpull::{make_deletions_stream, make_updates_stream, Lifecycle, StreamKind};
use pushpull_core::{BridgeError, Demand, Subscription};
use pushpull_test_utils::{
    Download, Event, FakePaymentQueue, QueueRecorder, Transaction, TransactionState,
};
use std::sync::Arc;

fn batch(ids: &[u64]) -> Vec<Transaction> {
    ids.iter()
        .map(|id| Transaction::purchasing(*id, format!("product-{id}")))
        .collect()
}

#[test]
fn subscribe_registers_once_and_hands_out_subscription() {
    let queue = Arc::new(FakePaymentQueue::new());
    let subscriber = QueueRecorder::new();

    let subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());

    assert_eq!(queue.registrations(), 1);
    assert_eq!(queue.observer_count(), 1);
    assert!(subscriber.subscription().is_some());
    assert!(matches!(subscriber.events().as_slice(), [Event::Subscribed]));

    let snapshot = subscription.snapshot();
    assert_eq!(snapshot.kind, StreamKind::Updates);
    assert_eq!(snapshot.lifecycle, Lifecycle::Active);
    assert_eq!(snapshot.demand, Demand::NONE);
    assert!(snapshot.registered);
}

#[test]
fn no_implicit_demand_drops_first_batch() {
    let queue = Arc::new(FakePaymentQueue::new());
    let subscriber = QueueRecorder::new();
    let _subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());

    queue.update(batch(&[1]));

    assert!(subscriber.values().is_empty());
}

#[test]
fn dropped_batch_is_not_delivered_retroactively() {
    let queue = Arc::new(FakePaymentQueue::new());
    let subscriber = QueueRecorder::new();
    let _subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());

    queue.update(batch(&[1]));
    subscriber.request(Demand::max(1));
    assert!(subscriber.values().is_empty());

    queue.update(batch(&[2]));
    assert_eq!(subscriber.values(), vec![batch(&[2])]);
}

#[test]
fn delivers_exactly_the_requested_number_of_batches() {
    let queue = Arc::new(FakePaymentQueue::new());
    let subscriber = QueueRecorder::new().with_initial_demand(Demand::max(2));
    let subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());

    for id in 1..=4 {
        queue.update(batch(&[id]));
    }

    assert_eq!(subscriber.values(), vec![batch(&[1]), batch(&[2])]);
    assert_eq!(subscription.snapshot().demand, Demand::NONE);
}

#[test]
fn batches_are_passed_through_whole() {
    let queue = Arc::new(FakePaymentQueue::new());
    let subscriber = QueueRecorder::new().with_initial_demand(Demand::UNLIMITED);
    let _subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());

    queue.update(batch(&[1, 2, 3]));
    queue.update(batch(&[4]));

    assert_eq!(subscriber.values(), vec![batch(&[1, 2, 3]), batch(&[4])]);
}

#[test]
fn demand_returned_from_receive_is_added_back() {
    let queue = Arc::new(FakePaymentQueue::new());
    let subscriber = QueueRecorder::new()
        .with_initial_demand(Demand::max(1))
        .with_demand_per_value(Demand::max(1));
    let subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());

    for id in 1..=5 {
        queue.update(batch(&[id]));
    }

    assert_eq!(subscriber.values().len(), 5);
    assert_eq!(subscription.snapshot().demand, Demand::max(1));
}

#[test]
fn unlimited_demand_is_never_used_up() {
    let queue = Arc::new(FakePaymentQueue::new());
    let subscriber = QueueRecorder::new().with_initial_demand(Demand::UNLIMITED);
    let subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());

    for id in 0..100 {
        queue.update(batch(&[id]));
    }

    assert_eq!(subscriber.values().len(), 100);
    assert_eq!(subscription.snapshot().demand, Demand::UNLIMITED);
}

#[test]
fn requests_saturate_at_unlimited() {
    let queue = Arc::new(FakePaymentQueue::new());
    let subscriber = QueueRecorder::new();
    let subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());

    subscriber.request(Demand::max(u64::MAX - 1));
    subscriber.request(Demand::max(2));

    assert_eq!(subscription.snapshot().demand, Demand::UNLIMITED);
}

#[test]
fn updates_and_deletions_never_cross_deliver() {
    let queue = Arc::new(FakePaymentQueue::new());
    let updates = QueueRecorder::new().with_initial_demand(Demand::UNLIMITED);
    let deletions = QueueRecorder::new().with_initial_demand(Demand::UNLIMITED);
    let _u = make_updates_stream(&queue).make_subscription(updates.clone());
    let _d = make_deletions_stream(&queue).make_subscription(deletions.clone());

    queue.update(batch(&[1]));
    queue.remove(batch(&[2]));
    queue.update(batch(&[3]));

    assert_eq!(updates.values(), vec![batch(&[1]), batch(&[3])]);
    assert_eq!(deletions.values(), vec![batch(&[2])]);
}

#[test]
fn optional_notifications_are_ignored() {
    let queue = Arc::new(FakePaymentQueue::new());
    let subscriber = QueueRecorder::new().with_initial_demand(Demand::UNLIMITED);
    let subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());

    queue.update_downloads(vec![Download {
        transaction_id: 1,
        progress: 0.5,
    }]);
    queue.finish_restore();
    queue.change_storefront();

    assert!(matches!(subscriber.events().as_slice(), [Event::Subscribed]));
    assert_eq!(subscription.snapshot().lifecycle, Lifecycle::Active);
}

#[test]
fn backlog_reported_during_registration_is_delivered() {
    let queue = Arc::new(FakePaymentQueue::new());
    queue.set_backlog(vec![Transaction::new(9, "coins", TransactionState::Restored)]);
    let subscriber = QueueRecorder::new().with_initial_demand(Demand::max(1));

    let subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());

    assert_eq!(
        subscriber.values(),
        vec![vec![Transaction::new(9, "coins", TransactionState::Restored)]]
    );
    assert!(subscription.snapshot().registered);
}

#[test]
fn restore_failure_terminates_and_deregisters() {
    let queue = Arc::new(FakePaymentQueue::new());
    let subscriber = QueueRecorder::new().with_initial_demand(Demand::max(3));
    let subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());

    queue.update(batch(&[1]));
    queue.fail_restore(BridgeError::source_failure("restore interrupted"));

    let events = subscriber.events();
    assert!(matches!(
        events.as_slice(),
        [Event::Subscribed, Event::Value(_), Event::Failed(BridgeError::SourceFailure { context })]
            if context == "restore interrupted"
    ));

    let snapshot = subscription.snapshot();
    assert_eq!(snapshot.lifecycle, Lifecycle::Failed);
    assert_eq!(snapshot.demand, Demand::max(1));
    assert!(!snapshot.registered);
    assert_eq!(queue.deregistrations(), 1);
    assert!(subscriber.subscription().is_none());
}

#[test]
fn failure_is_delivered_without_demand() {
    let queue = Arc::new(FakePaymentQueue::new());
    let subscriber = QueueRecorder::new();
    let _subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());

    queue.fail_restore(BridgeError::source_failure("offline"));

    assert_eq!(subscriber.completions(), 1);
}

#[test]
fn nothing_follows_a_failure() {
    let queue = Arc::new(FakePaymentQueue::new());
    let subscriber = QueueRecorder::new().with_initial_demand(Demand::UNLIMITED);
    let subscription = make_updates_stream(&queue).make_subscription(subscriber.clone());

    queue.fail_restore(BridgeError::source_failure("first"));
    queue.fail_restore(BridgeError::source_failure("second"));
    queue.update(batch(&[1]));

    assert_eq!(subscriber.completions(), 1);
    assert!(subscriber.values().is_empty());
    // Requests after termination are ignored
    subscription.request(Demand::max(5));
    assert_eq!(subscription.snapshot().demand, Demand::UNLIMITED);
}

#[test]
fn display_and_debug_describe_the_subscription() {
    let queue = Arc::new(FakePaymentQueue::new());
    let subscription = make_updates_stream(&queue).make_subscription(QueueRecorder::new());

    assert_eq!(subscription.to_string(), "payment queue observer");
    let debug = format!("{subscription:?}");
    assert!(debug.contains("QueueSubscription"));
    assert!(debug.contains("Updates"));
}
