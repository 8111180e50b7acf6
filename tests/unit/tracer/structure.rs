use chain_trace::provider::InMemoryProvider;
use chain_trace::tracer::{ChainTracer, MAX_CHILDREN_PER_OUTPUT};
use chain_trace::types::{AddressReference, TraceNode};
use std::collections::HashSet;
use std::sync::Arc;

use crate::common::{forward_scenario, hash, linear_chain, TxBuilder};

fn all_nodes(root: &TraceNode) -> Vec<&TraceNode> {
    let mut nodes = vec![root];
    let mut i = 0;
    while i < nodes.len() {
        let node = nodes[i];
        nodes.extend(node.children.iter().map(|c| &c.node));
        i += 1;
    }
    nodes
}

#[tokio::test]
async fn test_later_reference_becomes_child_earlier_does_not() {
    let tracer = ChainTracer::new(Arc::new(forward_scenario()));

    let root = tracer.trace(&hash(0), 3).await.unwrap();

    assert_eq!(root.hash, hash(0));
    assert_eq!(root.block_height, Some(100));
    assert_eq!(root.children.len(), 1);

    let child = &root.children[0];
    assert_eq!(child.node.hash, hash(1));
    assert_eq!(child.value, 5);
    assert_eq!(child.address, "A");

    let hashes: HashSet<&str> = all_nodes(&root).iter().map(|n| n.hash.as_str()).collect();
    assert!(!hashes.contains(hash(2).as_str()));
}

#[tokio::test]
async fn test_paths_never_exceed_max_depth() {
    for depth in 1..=6 {
        let tracer = ChainTracer::new(Arc::new(linear_chain(10)));
        let root = tracer.trace(&hash(0), depth).await.unwrap();

        assert_eq!(root.depth(), depth as usize, "depth {}", depth);
        for path in root.paths() {
            assert!(path.len() <= depth as usize);
        }
    }
}

#[tokio::test]
async fn test_depth_one_makes_no_reference_lookups() {
    let provider = Arc::new(linear_chain(3));
    let root = ChainTracer::new(provider.clone())
        .trace(&hash(0), 1)
        .await
        .unwrap();

    assert!(root.children.is_empty());
    assert_eq!(root.total, Some(999));
    assert_eq!(provider.transaction_calls(), 1);
    assert_eq!(provider.reference_calls(), 0);
}

#[tokio::test]
async fn test_deepest_nodes_carry_transaction_data() {
    let root = ChainTracer::new(Arc::new(linear_chain(5)))
        .trace(&hash(0), 3)
        .await
        .unwrap();

    let expected = [hash(0), hash(1), hash(2)];
    assert_eq!(
        root.paths(),
        vec![expected.iter().map(String::as_str).collect::<Vec<_>>()]
    );

    let leaf = &root.children[0].node.children[0].node;
    assert_eq!(leaf.block_height, Some(102));
    assert!(leaf.children.is_empty());
    assert!(!leaf.already_visited);
}

#[tokio::test]
async fn test_unconfirmed_cycle_is_cut_on_path() {
    let u0 = hash(0xa0);
    let u1 = hash(0xa1);
    let provider = InMemoryProvider::new()
        .with_transaction(TxBuilder::new(&u0).input("A", 10).output("B", 9).build())
        .with_transaction(TxBuilder::new(&u1).input("B", 9).output("A", 8).build());

    let root = ChainTracer::new(Arc::new(provider))
        .trace(&u0, 6)
        .await
        .unwrap();

    for path in root.paths() {
        let distinct: HashSet<&str> = path.iter().copied().collect();
        assert_eq!(distinct.len(), path.len(), "repeated hash on {:?}", path);
    }
    assert_eq!(root.paths(), vec![vec![u0.as_str(), u1.as_str()]]);
}

#[tokio::test]
async fn test_sibling_branches_may_share_a_transaction() {
    // X spends both outputs of the root, so it is reachable along two edges
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
                .input("C", 9)
                .output("Z", 18)
                .build(),
        );

    let root = ChainTracer::new(Arc::new(provider))
        .trace(&hash(0), 3)
        .await
        .unwrap();

    assert_eq!(root.children.len(), 2);
    for child in &root.children {
        assert_eq!(child.node.hash, hash(1));
        assert!(!child.node.already_visited);
        assert_eq!(child.node.block_height, Some(101));
    }
    assert_eq!(root.children[0].address, "A");
    assert_eq!(root.children[1].address, "C");
}

#[tokio::test]
async fn test_fan_out_bounded_per_resolved_output() {
    let later = |n: u64| AddressReference::confirmed(hash(n), 200 + n);
    let provider = InMemoryProvider::new()
        .with_transaction(
            TxBuilder::new(hash(0))
                .height(100)
                .input("S", 100)
                .output("A", 40)
                .output("C", 30)
                .unresolved_output(0)
                .build(),
        )
        .with_references("A", vec![later(5), later(3), later(4), later(6)])
        .with_references("C", vec![later(7), later(8), later(9)]);

    let root = ChainTracer::new(Arc::new(provider))
        .trace(&hash(0), 2)
        .await
        .unwrap();

    let resolved = root.outputs.iter().filter(|o| o.address != "Unknown").count();
    assert_eq!(resolved, 2);
    assert!(root.children.len() <= MAX_CHILDREN_PER_OUTPUT * resolved);

    // Lowest heights first, per output
    let via_a: Vec<&str> = root
        .children
        .iter()
        .filter(|c| c.address == "A")
        .map(|c| c.node.hash.as_str())
        .collect();
    assert_eq!(via_a, vec![hash(3).as_str(), hash(4).as_str()]);

    let via_c = root.children.iter().filter(|c| c.address == "C").count();
    assert_eq!(via_c, 2);
}

#[tokio::test]
async fn test_duplicate_references_expand_once() {
    let provider = InMemoryProvider::new()
        .with_transaction(
            TxBuilder::new(hash(0))
                .height(100)
                .input("S", 10)
                .output("A", 9)
                .build(),
        )
        .with_references(
            "A",
            vec![
                AddressReference::confirmed(hash(1), 101),
                AddressReference::confirmed(hash(1), 101),
            ],
        );

    let root = ChainTracer::new(Arc::new(provider))
        .trace(&hash(0), 2)
        .await
        .unwrap();

    assert_eq!(root.children.len(), 1);
}
