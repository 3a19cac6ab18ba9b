// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! In-memory [`TransactionQueue`] driven by the test.
//!
//! Notifications are delivered synchronously on the calling thread, to a snapshot of
//! the observers registered at that moment. The observer list lock is never held
//! while an observer runs, so observers may add or remove themselves re-entrantly.
//!
//! Like a real queue replaying unfinished transactions, a queue with a backlog reports
//! it to each new observer from inside `add_observer`.

use crate::fixtures::{Download, Transaction};
use parking_lot::Mutex;
use pushpull::{TransactionObserver, TransactionQueue};
use pushpull_core::BridgeError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type Observer = Arc<dyn TransactionObserver<FakePaymentQueue>>;

/// A payment queue with any number of observers.
#[derive(Default)]
pub struct FakePaymentQueue {
    observers: Mutex<Vec<Observer>>,
    backlog: Mutex<Vec<Transaction>>,
    added: AtomicUsize,
    removed: AtomicUsize,
}

impl FakePaymentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transactions reported to every observer as it registers.
    pub fn set_backlog(&self, transactions: Vec<Transaction>) {
        *self.backlog.lock() = transactions;
    }

    /// Reports `transactions` as updated.
    pub fn update(&self, transactions: Vec<Transaction>) {
        for observer in self.snapshot() {
            observer.updated_transactions(&transactions);
        }
    }

    /// Reports `transactions` as removed.
    pub fn remove(&self, transactions: Vec<Transaction>) {
        for observer in self.snapshot() {
            observer.removed_transactions(&transactions);
        }
    }

    /// Reports a failed restore.
    pub fn fail_restore(&self, error: BridgeError) {
        for observer in self.snapshot() {
            observer.restore_failed(&error);
        }
    }

    pub fn finish_restore(&self) {
        for observer in self.snapshot() {
            observer.restore_finished();
        }
    }

    pub fn update_downloads(&self, downloads: Vec<Download>) {
        for observer in self.snapshot() {
            observer.updated_downloads(&downloads);
        }
    }

    pub fn change_storefront(&self) {
        for observer in self.snapshot() {
            observer.storefront_changed();
        }
    }

    /// Observers currently registered.
    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    /// Total successful `add_observer` calls.
    pub fn registrations(&self) -> usize {
        self.added.load(Ordering::SeqCst)
    }

    /// Total `remove_observer` calls that found their observer.
    pub fn deregistrations(&self) -> usize {
        self.removed.load(Ordering::SeqCst)
    }

    fn snapshot(&self) -> Vec<Observer> {
        self.observers.lock().clone()
    }
}

impl TransactionQueue for FakePaymentQueue {
    type Transaction = Transaction;
    type Download = Download;
    type Error = BridgeError;

    fn add_observer(&self, observer: Observer) {
        self.observers.lock().push(Arc::clone(&observer));
        self.added.fetch_add(1, Ordering::SeqCst);

        let backlog = self.backlog.lock().clone();
        if !backlog.is_empty() {
            observer.updated_transactions(&backlog);
        }
    }

    fn remove_observer(&self, observer: &Observer) {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|registered| !Arc::ptr_eq(registered, observer));
        if observers.len() < before {
            self.removed.fetch_add(1, Ordering::SeqCst);
        }
    }
}
