// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! In-memory [`ProductRequest`] answered explicitly by the test.

use crate::fixtures::{Product, ProductsResponse};
use parking_lot::Mutex;
use pushpull::{FromProductIdentifiers, ProductRequest, RequestDelegate};
use pushpull_core::BridgeError;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

type Delegate = Weak<dyn RequestDelegate<FakeProductRequest>>;

/// A product request whose answer is produced by [`respond`](Self::respond) or
/// [`fail`](Self::fail).
#[derive(Default)]
pub struct FakeProductRequest {
    identifiers: HashSet<String>,
    delegate: Mutex<Option<Delegate>>,
    started: AtomicUsize,
    cancelled: AtomicUsize,
}

impl FakeProductRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifiers(&self) -> &HashSet<String> {
        &self.identifiers
    }

    /// Answers the current delegate. Returns `false` when no live delegate is set.
    pub fn respond(&self, response: ProductsResponse) -> bool {
        match self.delegate() {
            Some(delegate) => {
                delegate.did_receive(response);
                true
            }
            None => false,
        }
    }

    /// Answers with one product per requested identifier, priced at 99 cents.
    pub fn respond_with_catalog(&self) -> bool {
        let mut products: Vec<Product> = self
            .identifiers
            .iter()
            .map(|identifier| Product {
                identifier: identifier.clone(),
                price_cents: 99,
            })
            .collect();
        products.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        self.respond(ProductsResponse {
            products,
            invalid_identifiers: Vec::new(),
        })
    }

    /// Fails the request. Returns `false` when no live delegate is set.
    pub fn fail(&self, error: BridgeError) -> bool {
        match self.delegate() {
            Some(delegate) => {
                delegate.did_fail(error);
                true
            }
            None => false,
        }
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate().is_some()
    }

    pub fn start_count(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn cancel_count(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn delegate(&self) -> Option<Arc<dyn RequestDelegate<Self>>> {
        self.delegate.lock().as_ref().and_then(Weak::upgrade)
    }
}

impl ProductRequest for FakeProductRequest {
    type Response = ProductsResponse;
    type Error = BridgeError;

    fn set_delegate(&self, delegate: Option<Delegate>) {
        *self.delegate.lock() = delegate;
    }

    fn start(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn cancel(&self) {
        self.cancelled.fetch_add(1, Ordering::SeqCst);
    }
}

impl FromProductIdentifiers for FakeProductRequest {
    fn from_product_identifiers(identifiers: HashSet<String>) -> Self {
        Self {
            identifiers,
            ..Self::default()
        }
    }
}
