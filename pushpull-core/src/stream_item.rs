// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{BridgeError, IntoBridgeError, Result};

/// One delivery seen through an async bridge stream.
///
/// A stream yields any number of `Batch` items and at most one `Failed` item,
/// which is always the last.
#[derive(Debug, Clone)]
pub enum StreamItem<T> {
    /// A batch delivered by the source.
    Batch(T),
    /// The source failure that ended the subscription.
    Failed(BridgeError),
}

impl<T> StreamItem<T> {
    /// Wraps a source's own failure type.
    pub fn failure(error: impl IntoBridgeError) -> Self {
        Self::Failed(error.into_bridge_error())
    }

    pub const fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }

    /// Whether this item ended the stream.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The delivered batch, or the failure that ended the stream.
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Batch(batch) => Ok(batch),
            Self::Failed(error) => Err(error),
        }
    }
}
