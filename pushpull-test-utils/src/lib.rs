// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the pushpull workspace.
//!
//! This crate is designed for use in development and testing only.
//!
//! # Key Types
//!
//! - [`FakePaymentQueue`]: a multi-observer transaction queue the test drives by hand
//! - [`FakeProductRequest`]: a one-shot request the test answers by hand
//! - [`RecordingSubscriber`]: a subscriber that records every call it receives
//!
//! # Example
//!
//! ```rust
//! use pushpull::make_one_shot_stream;
//! use pushpull_test_utils::{Event, FakeProductRequest, ResponseRecorder};
//! use std::sync::Arc;
//!
//! let request = Arc::new(FakeProductRequest::new());
//! let subscriber = ResponseRecorder::new();
//! let _subscription = make_one_shot_stream(&request).make_subscription(subscriber.clone());
//!
//! assert!(request.respond_with_catalog());
//! assert!(matches!(
//!     subscriber.events().as_slice(),
//!     [Event::Subscribed, Event::Value(_), Event::Finished]
//! ));
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod fixtures;
pub mod payment_queue;
pub mod product_request;
pub mod recording_subscriber;

pub use fixtures::{Download, Product, ProductsResponse, Transaction, TransactionState};
pub use payment_queue::FakePaymentQueue;
pub use product_request::FakeProductRequest;
pub use recording_subscriber::{Event, RecordingSubscriber};

use pushpull_core::BridgeError;

/// Recorder for transaction batches from a [`FakePaymentQueue`].
pub type QueueRecorder = RecordingSubscriber<Vec<Transaction>, BridgeError>;

/// Recorder for the response of a [`FakeProductRequest`].
pub type ResponseRecorder = RecordingSubscriber<ProductsResponse, BridgeError>;
