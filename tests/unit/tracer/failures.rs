use chain_trace::errors::ValidationError;
use chain_trace::provider::InMemoryProvider;
use chain_trace::tracer::ChainTracer;
use std::sync::Arc;

use crate::common::{forward_scenario, hash, linear_chain, TxBuilder};

#[tokio::test]
async fn test_not_found_root_is_single_error_node_at_any_depth() {
    for depth in 1..=5 {
        let provider = Arc::new(InMemoryProvider::new());
        let root = ChainTracer::new(provider.clone())
            .trace(&hash(99), depth)
            .await
            .unwrap();

        assert_eq!(root.hash, hash(99));
        assert!(root.is_error());
        assert!(root.children.is_empty());
        assert_eq!(provider.transaction_calls(), 1);
        assert_eq!(provider.reference_calls(), 0);
    }
}

#[tokio::test]
async fn test_failed_child_lookup_becomes_error_node() {
    let provider = forward_scenario().fail_transaction(&hash(1));

    let root = ChainTracer::new(Arc::new(provider))
        .trace(&hash(0), 3)
        .await
        .unwrap();

    assert!(!root.is_error());
    assert_eq!(root.children.len(), 1);
    let child = &root.children[0].node;
    assert_eq!(child.hash, hash(1));
    assert!(child
        .error
        .as_deref()
        .is_some_and(|e| e.contains("injected failure")));
    assert!(child.children.is_empty());
}

#[tokio::test]
async fn test_failed_reference_lookup_only_truncates_that_output() {
    let provider = InMemoryProvider::new()
        .with_transaction(
            TxBuilder::new(hash(0))
                .height(100)
                .input("S", 20)
                .output("A", 10)
                .output("C", 9)
                .build(),
        )
        .with_transaction(
            TxBuilder::new(hash(1))
                .height(101)
                .input("A", 10)
                .output("Y", 9)
                .build(),
        )
        .with_transaction(
            TxBuilder::new(hash(2))
                .height(102)
                .input("C", 9)
                .output("Z", 8)
                .build(),
        )
        .fail_address("A");

    let root = ChainTracer::new(Arc::new(provider))
        .trace(&hash(0), 3)
        .await
        .unwrap();

    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].address, "C");
    assert_eq!(root.children[0].node.hash, hash(2));
    assert!(!root.children[0].node.is_error());
}

#[tokio::test]
async fn test_invalid_input_rejected_before_any_provider_call() {
    let provider = Arc::new(forward_scenario());
    let tracer = ChainTracer::new(provider.clone());

    assert_eq!(tracer.trace("", 3).await, Err(ValidationError::EmptyHash));
    assert_eq!(tracer.trace("   ", 3).await, Err(ValidationError::EmptyHash));
    assert!(matches!(
        tracer.trace("zz-not-hex", 3).await,
        Err(ValidationError::InvalidHash { .. })
    ));
    assert_eq!(
        tracer.trace(&hash(0), 0).await,
        Err(ValidationError::InvalidDepth { depth: 0 })
    );

    assert_eq!(provider.transaction_calls(), 0);
    assert_eq!(provider.reference_calls(), 0);
}

#[tokio::test]
async fn test_no_depth_ceiling_in_tracer() {
    let provider = Arc::new(linear_chain(20));
    let root = ChainTracer::new(provider.clone())
        .trace(&hash(0), 15)
        .await
        .unwrap();

    assert_eq!(root.depth(), 15);
    assert_eq!(provider.transaction_calls(), 15);
}

#[tokio::test]
async fn test_uppercase_seed_matches_lowercase_ledger() {
    let root = ChainTracer::new(Arc::new(forward_scenario()))
        .trace(&hash(0).to_ascii_uppercase(), 3)
        .await
        .unwrap();

    assert_eq!(root.hash, hash(0));
    assert!(!root.is_error());
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].node.hash, hash(1));
}

#[tokio::test]
async fn test_seed_hash_is_trimmed() {
    let provider = Arc::new(forward_scenario());
    let root = ChainTracer::new(provider.clone())
        .trace(&format!("  {}\n", hash(0)), 2)
        .await
        .unwrap();

    assert_eq!(root.hash, hash(0));
    assert_eq!(provider.requested_hashes()[0], hash(0));
}
