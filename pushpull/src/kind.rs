// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;

/// Logical channel a subscription is bound to. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Transactions added to or changed on a payment queue.
    Updates,
    /// Transactions removed from a payment queue.
    Deletions,
    /// The single response of a product request.
    Response,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updates => write!(f, "updates"),
            Self::Deletions => write!(f, "deletions"),
            Self::Response => write!(f, "response"),
        }
    }
}

/// The payment queue channels a continuous subscription can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueChannel {
    Updates,
    Deletions,
}

impl From<QueueChannel> for StreamKind {
    fn from(channel: QueueChannel) -> Self {
        match channel {
            QueueChannel::Updates => Self::Updates,
            QueueChannel::Deletions => Self::Deletions,
        }
    }
}
