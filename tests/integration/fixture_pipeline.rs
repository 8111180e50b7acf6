//! Fixture Pipeline Test
//!
//! Loads the fixture ledger, traces the seed transaction and analyses one of
//! the addresses it pays, checking both the data and its JSON rendering.

use anyhow::Result;
use chain_trace::analysis::{AddressAnalyser, TraceStats};
use chain_trace::cli::commands::trace::TraceOutput;
use chain_trace::provider::InMemoryProvider;
use chain_trace::tracer::ChainTracer;
use chain_trace::types::{PatternType, Severity};
use std::sync::Arc;

use super::{fixture_hash, fixture_path, SEED_HASH};

fn load() -> Result<Arc<InMemoryProvider>> {
    Ok(Arc::new(InMemoryProvider::load_fixture(&fixture_path())?))
}

#[tokio::test]
async fn test_trace_fixture_ledger() -> Result<()> {
    let provider = load()?;
    let tree = ChainTracer::new(provider.clone()).trace(SEED_HASH, 3).await?;

    assert_eq!(tree.hash, fixture_hash(0));
    assert_eq!(tree.fees, Some(10_000));

    let edges: Vec<(&str, u64, &str)> = tree
        .children
        .iter()
        .map(|c| (c.address.as_str(), c.value, c.node.hash.as_str()))
        .collect();
    let (h1, h2) = (fixture_hash(1), fixture_hash(2));
    assert_eq!(
        edges,
        vec![("A", 50_000_000, h1.as_str()), ("B", 12_345_678, h2.as_str())]
    );

    // A's earlier funding transaction never appears
    let h3 = fixture_hash(3);
    assert!(tree.paths().iter().flatten().all(|h| *h != h3.as_str()));

    let via_a = &tree.children[0].node;
    assert_eq!(via_a.children.len(), 1);
    assert_eq!(via_a.children[0].address, "R");
    assert_eq!(via_a.children[0].node.hash, fixture_hash(4));

    let stats = TraceStats::from_tree(&tree);
    assert_eq!(stats.node_count, 4);
    assert_eq!(stats.max_path_length, 3);
    assert_eq!(stats.unique_transactions, 4);
    assert_eq!(stats.error_nodes, 0);
    assert_eq!(stats.total_edge_value, 90_345_678);

    // Every fetched node was requested exactly once
    assert_eq!(provider.transaction_calls(), 4);
    Ok(())
}

#[tokio::test]
async fn test_trace_output_json_shape() -> Result<()> {
    let tree = ChainTracer::new(load()?).trace(SEED_HASH, 2).await?;
    let stats = TraceStats::from_tree(&tree);

    let json = serde_json::to_value(TraceOutput { tree, stats })?;

    assert_eq!(json["tree"]["hash"], SEED_HASH);
    assert_eq!(json["tree"]["blockHeight"], 800_000);
    assert_eq!(json["tree"]["outputs"][1]["address"], "B");
    assert_eq!(json["tree"]["alreadyVisited"], false);
    assert!(json["tree"].get("error").is_none());

    let child = &json["tree"]["children"][0];
    assert_eq!(child["address"], "A");
    assert_eq!(child["value"], 50_000_000);
    assert_eq!(child["hash"], fixture_hash(1));
    assert_eq!(child["children"].as_array().map(Vec::len), Some(0));

    assert_eq!(json["stats"]["nodeCount"], 3);
    assert_eq!(json["stats"]["maxPathLength"], 2);
    Ok(())
}

#[tokio::test]
async fn test_analyse_fixture_address() -> Result<()> {
    let report = AddressAnalyser::new(load()?).analyse("A", 50).await?;

    assert_eq!(report.summary.address, "A");
    assert_eq!(report.summary.total_received, 80_000_000);
    assert_eq!(report.summary.total_sent, 50_000_000);
    assert_eq!(report.summary.balance, 30_000_000);
    assert_eq!(report.summary.n_tx, 3);
    assert_eq!(report.transaction_count, 3);

    let kinds: Vec<(PatternType, Severity)> = report
        .patterns
        .iter()
        .map(|p| (p.pattern_type, p.severity))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (PatternType::RapidSuccession, Severity::Medium),
            (PatternType::RoundTrip, Severity::High)
        ]
    );
    assert_eq!(report.patterns[1].address.as_deref(), Some("R"));

    let json = serde_json::to_value(&report)?;
    assert_eq!(json["transactionCount"], 3);
    assert_eq!(json["patterns"][0]["type"], "rapid-succession");
    assert_eq!(json["patterns"][0]["severity"], "medium");
    assert_eq!(json["patterns"][1]["address"], "R");
    Ok(())
}

#[tokio::test]
async fn test_precise_receipt_in_fixture() -> Result<()> {
    let report = AddressAnalyser::new(load()?).analyse("B", 50).await?;

    let precise: Vec<_> = report
        .patterns
        .iter()
        .filter(|p| p.pattern_type == PatternType::PreciseAmount)
        .collect();
    assert_eq!(precise.len(), 1);
    assert!(precise[0].description.contains("0.12345678"));
    Ok(())
}
