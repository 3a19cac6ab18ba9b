// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types for the pushpull callback-to-stream bridge.
//!
//! This crate holds the pieces every bridge shares and that carry no knowledge of
//! any particular callback source:
//!
//! - [`Demand`]: saturating, never-negative count of deliveries a consumer accepts
//! - [`Subscriber`], [`Subscription`], [`Publisher`]: the demand-driven consumer contract
//! - [`BridgeError`]: errors surfaced to consumers as terminal failures
//! - [`StreamItem`]: value-or-error items yielded by the async stream adapter
//! - [`bridge_mutex`]: the bookkeeping and delivery lock primitives

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod bridge_mutex;
pub mod demand;
pub mod error;
pub mod stream_item;
pub mod subscriber;

pub use self::demand::Demand;
pub use self::error::{BridgeError, IntoBridgeError, Result};
pub use self::stream_item::StreamItem;
pub use self::subscriber::{Completion, Publisher, Subscriber, Subscription};
