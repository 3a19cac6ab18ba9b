// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pushpull::{make_one_shot_stream, BridgeConfig, Lifecycle, OverflowPolicy, StreamKind};
use pushpull_core::{BridgeError, Demand, Subscription};
use pushpull_test_utils::{Event, FakeProductRequest, Product, ProductsResponse, ResponseRecorder};
use std::sync::Arc;

fn response(identifier: &str) -> ProductsResponse {
    ProductsResponse {
        products: vec![Product {
            identifier: identifier.to_string(),
            price_cents: 199,
        }],
        invalid_identifiers: Vec::new(),
    }
}

#[test]
fn subscribe_installs_delegate_and_starts_request() {
    let request = Arc::new(FakeProductRequest::new());
    let subscriber = ResponseRecorder::new();

    let subscription = make_one_shot_stream(&request).make_subscription(subscriber.clone());

    assert!(request.has_delegate());
    assert_eq!(request.start_count(), 1);
    assert_eq!(request.cancel_count(), 0);

    let snapshot = subscription.snapshot();
    assert_eq!(snapshot.kind, StreamKind::Response);
    assert_eq!(snapshot.lifecycle, Lifecycle::Active);
    assert_eq!(snapshot.demand, Demand::max(1));
}

#[test]
fn response_is_delivered_without_any_request() {
    let request = Arc::new(FakeProductRequest::new());
    let subscriber = ResponseRecorder::new();
    let subscription = make_one_shot_stream(&request).make_subscription(subscriber.clone());

    assert!(request.respond(response("coins")));

    assert!(matches!(
        subscriber.events().as_slice(),
        [Event::Subscribed, Event::Value(value), Event::Finished] if *value == response("coins")
    ));
    assert_eq!(subscription.snapshot().lifecycle, Lifecycle::Completed);
}

#[test]
fn completion_clears_delegate_without_cancelling() {
    let request = Arc::new(FakeProductRequest::new());
    let subscription = make_one_shot_stream(&request).make_subscription(ResponseRecorder::new());

    request.respond(response("coins"));

    assert!(!request.has_delegate());
    assert_eq!(request.cancel_count(), 0);
    assert!(!subscription.snapshot().registered);
}

#[test]
fn second_response_goes_nowhere() {
    let request = Arc::new(FakeProductRequest::new());
    let subscriber = ResponseRecorder::new();
    let _subscription = make_one_shot_stream(&request).make_subscription(subscriber.clone());

    assert!(request.respond(response("coins")));
    assert!(!request.respond(response("gems")));
    assert!(!request.fail(BridgeError::source_failure("late")));

    assert_eq!(subscriber.values(), vec![response("coins")]);
    assert_eq!(subscriber.completions(), 1);
}

#[test]
fn failure_is_delivered_instead_of_a_value() {
    let request = Arc::new(FakeProductRequest::new());
    let subscriber = ResponseRecorder::new();
    let subscription = make_one_shot_stream(&request).make_subscription(subscriber.clone());

    assert!(request.fail(BridgeError::source_failure("store unavailable")));

    let events = subscriber.events();
    assert!(matches!(
        events.as_slice(),
        [Event::Subscribed, Event::Failed(BridgeError::SourceFailure { context })]
            if context == "store unavailable"
    ));
    assert_eq!(subscription.snapshot().lifecycle, Lifecycle::Failed);
    assert!(!request.has_delegate());
    assert_eq!(request.cancel_count(), 0);
}

#[test]
fn cancel_before_response_cancels_the_request_once() {
    let request = Arc::new(FakeProductRequest::new());
    let subscriber = ResponseRecorder::new();
    let subscription = make_one_shot_stream(&request).make_subscription(subscriber.clone());

    subscriber.cancel();
    subscriber.cancel();

    assert_eq!(request.cancel_count(), 1);
    assert!(!request.has_delegate());
    assert!(!request.respond(response("coins")));
    assert!(matches!(subscriber.events().as_slice(), [Event::Subscribed]));
    assert_eq!(subscription.snapshot().lifecycle, Lifecycle::Cancelled);
}

#[test]
fn cancel_after_completion_is_a_no_op() {
    let request = Arc::new(FakeProductRequest::new());
    let subscription = make_one_shot_stream(&request).make_subscription(ResponseRecorder::new());

    request.respond(response("coins"));
    subscription.cancel();

    assert_eq!(request.cancel_count(), 0);
    assert_eq!(subscription.snapshot().lifecycle, Lifecycle::Completed);
}

#[test]
fn zero_initial_demand_finishes_without_a_value() {
    let request = Arc::new(FakeProductRequest::new());
    let subscriber = ResponseRecorder::new();
    let publisher = make_one_shot_stream(&request)
        .with_config(BridgeConfig::new().with_initial_demand(Demand::NONE));
    let _subscription = publisher.make_subscription(subscriber.clone());

    request.respond(response("coins"));

    assert!(matches!(
        subscriber.events().as_slice(),
        [Event::Subscribed, Event::Finished]
    ));
    assert!(!request.has_delegate());
}

#[test]
fn keep_latest_holds_response_until_requested() {
    let request = Arc::new(FakeProductRequest::new());
    let subscriber = ResponseRecorder::new();
    let publisher = make_one_shot_stream(&request).with_config(
        BridgeConfig::new()
            .with_initial_demand(Demand::NONE)
            .with_overflow(OverflowPolicy::KeepLatest),
    );
    let subscription = publisher.make_subscription(subscriber.clone());

    request.respond(response("coins"));
    assert!(matches!(subscriber.events().as_slice(), [Event::Subscribed]));
    assert!(subscription.snapshot().pending);

    subscriber.request(Demand::max(1));

    assert!(matches!(
        subscriber.events().as_slice(),
        [Event::Subscribed, Event::Value(value), Event::Finished] if *value == response("coins")
    ));
    assert!(!subscription.snapshot().pending);
}

#[test]
fn catalog_answers_every_requested_identifier() {
    let publisher =
        pushpull::ProductRequestPublisher::<FakeProductRequest>::for_identifiers(["gems", "coins"]);
    let request = Arc::clone(publisher.request());
    let subscriber = ResponseRecorder::new();
    let _subscription = publisher.make_subscription(subscriber.clone());

    assert!(request.respond_with_catalog());

    let values = subscriber.values();
    let identifiers: Vec<_> = values[0]
        .products
        .iter()
        .map(|product| product.identifier.as_str())
        .collect();
    assert_eq!(identifiers, vec!["coins", "gems"]);
}

#[test]
fn display_and_debug_describe_the_subscription() {
    let request = Arc::new(FakeProductRequest::new());
    let subscription = make_one_shot_stream(&request).make_subscription(ResponseRecorder::new());

    assert_eq!(subscription.to_string(), "product request observer");
    assert!(format!("{subscription:?}").contains("RequestSubscription"));
}
