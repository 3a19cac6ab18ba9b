// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Payload records carried by the fake sources. The bridge treats them as opaque.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionState {
    Purchasing,
    Purchased,
    Failed,
    Restored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: u64,
    pub product_id: String,
    pub state: TransactionState,
}

impl Transaction {
    pub fn new(id: u64, product_id: impl Into<String>, state: TransactionState) -> Self {
        Self {
            id,
            product_id: product_id.into(),
            state,
        }
    }

    pub fn purchasing(id: u64, product_id: impl Into<String>) -> Self {
        Self::new(id, product_id, TransactionState::Purchasing)
    }

    pub fn purchased(id: u64, product_id: impl Into<String>) -> Self {
        Self::new(id, product_id, TransactionState::Purchased)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub transaction_id: u64,
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub identifier: String,
    pub price_cents: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    pub invalid_identifiers: Vec<String>,
}
