// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pushpull_core::{BridgeError, StreamItem};

#[derive(Debug, thiserror::Error)]
#[error("storefront unavailable")]
struct StorefrontError;

#[test]
fn batch_converts_to_ok() {
    let item = StreamItem::Batch(vec![1, 2]);

    assert!(item.is_batch());
    assert!(!item.is_failure());
    assert_eq!(item.into_result().unwrap(), vec![1, 2]);
}

#[test]
fn failure_converts_to_err() {
    let item: StreamItem<u32> = StreamItem::Failed(BridgeError::source_failure("offline"));

    assert!(item.is_failure());
    let error = item.into_result().unwrap_err();
    assert_eq!(error.to_string(), "Source failure: offline");
}

#[test]
fn failure_wraps_source_errors() {
    let item: StreamItem<u32> = StreamItem::failure(StorefrontError);

    assert!(matches!(
        item.into_result(),
        Err(BridgeError::UserError(ref source)) if source.to_string() == "storefront unavailable"
    ));
}
