// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::kind::StreamKind;
use core::fmt;
use pushpull_core::Demand;

/// Lifecycle of a bridge subscription.
///
/// Only `Active` accepts source callbacks. Every other state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Active,
    Cancelled,
    Completed,
    Failed,
}

impl Lifecycle {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Read-only view of a subscription's bookkeeping, taken under its lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeSnapshot {
    pub kind: StreamKind,
    pub lifecycle: Lifecycle,
    pub demand: Demand,
    /// Whether the subscription is still attached to its source.
    pub registered: bool,
    /// Whether a batch is held back waiting for demand.
    pub pending: bool,
}
