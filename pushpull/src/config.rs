// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pushpull_core::Demand;

/// What a subscription does with a batch that arrives while demand is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Drop the batch. A later request never brings it back.
    #[default]
    DropNewest,
    /// Keep the most recent batch and deliver it as soon as demand is granted.
    ///
    /// Newer arrivals replace an undelivered one, so at most one batch is held.
    KeepLatest,
}

/// Per-subscription settings copied from the publisher.
///
/// # Example
///
/// ```
/// use pushpull::{BridgeConfig, OverflowPolicy};
/// use pushpull_core::Demand;
///
/// let config = BridgeConfig::new()
///     .with_overflow(OverflowPolicy::KeepLatest)
///     .with_initial_demand(Demand::UNLIMITED);
///
/// assert_eq!(config.overflow(), OverflowPolicy::KeepLatest);
/// assert_eq!(config.initial_demand(), Some(Demand::UNLIMITED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeConfig {
    overflow: OverflowPolicy,
    initial_demand: Option<Demand>,
}

impl BridgeConfig {
    /// Drop on overflow, default initial demand.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            overflow: OverflowPolicy::DropNewest,
            initial_demand: None,
        }
    }

    #[must_use]
    pub const fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Demand the subscription starts with, before the subscriber requests anything.
    ///
    /// Without an override, continuous streams start at [`Demand::NONE`] and the
    /// one-shot stream starts at `Demand::max(1)`.
    #[must_use]
    pub const fn with_initial_demand(mut self, demand: Demand) -> Self {
        self.initial_demand = Some(demand);
        self
    }

    #[must_use]
    pub const fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    #[must_use]
    pub const fn initial_demand(&self) -> Option<Demand> {
        self.initial_demand
    }
}
