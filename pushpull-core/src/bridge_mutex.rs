// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronization primitives used by bridge subscriptions.
//!
//! [`Mutex`] guards bookkeeping and is never held while calling into a subscriber.
//! [`ReentrantMutex`] serializes calls into the subscriber and may be re-acquired by
//! the delivering thread when the subscriber reacts synchronously.

pub use parking_lot::{Mutex, MutexGuard, ReentrantMutex, ReentrantMutexGuard};
