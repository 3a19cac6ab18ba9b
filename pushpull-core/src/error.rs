// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for pushpull bridges
//!
//! Only failures reported by a callback source become [`BridgeError`] values.
//! Misrouted callbacks are programming errors and panic instead; a batch dropped for
//! lack of demand is not an error at all.
//!
//! # Examples
//!
//! ```
//! use pushpull_core::{BridgeError, Result};
//!
//! fn restore() -> Result<()> {
//!     Err(BridgeError::source_failure("restore interrupted"))
//! }
//!
//! assert!(restore().is_err());
//! ```

/// Root error type for bridge failures
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The callback source reported a terminal failure
    #[error("Source failure: {context}")]
    SourceFailure {
        /// Description of what the source reported
        context: String,
    },

    /// An error produced by the source's own error type
    ///
    /// The async stream adapter wraps typed source failures in this variant.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BridgeError {
    /// Create a source failure with the given context
    pub fn source_failure(context: impl Into<String>) -> Self {
        Self::SourceFailure {
            context: context.into(),
        }
    }

    /// Wrap a source-native error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }
}

/// Specialized Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Extension trait for converting source errors into `BridgeError`
pub trait IntoBridgeError {
    /// Convert this error into a `BridgeError`
    fn into_bridge_error(self) -> BridgeError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoBridgeError for E {
    fn into_bridge_error(self) -> BridgeError {
        BridgeError::user_error(self)
    }
}

impl Clone for BridgeError {
    fn clone(&self) -> Self {
        match self {
            Self::SourceFailure { context } => Self::SourceFailure {
                context: context.clone(),
            },
            // Boxed errors can't be cloned, keep the message
            Self::UserError(e) => Self::SourceFailure {
                context: format!("User error: {}", e),
            },
        }
    }
}
