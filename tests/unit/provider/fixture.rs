use anyhow::Result;
use chain_trace::errors::AppError;
use chain_trace::provider::{InMemoryProvider, LedgerFixture, LedgerProvider, ProviderCache};
use chain_trace::types::AddressReference;
use std::io::Write;

use crate::common::{forward_scenario, hash};

const FIXTURE_JSON: &str = r#"{
    "transactions": [
        {
            "hash": "aa",
            "blockHeight": 10,
            "confirmed": "2024-03-01T12:00:00Z",
            "total": 90,
            "fees": 10,
            "inputs": [{ "addresses": ["S"], "value": 100, "prevHash": "99", "outputIndex": 0 }],
            "outputs": [{ "addresses": ["A"], "value": 90 }]
        }
    ],
    "references": {
        "A": [{ "txHash": "bb", "blockHeight": null }]
    }
}"#;

#[tokio::test]
async fn test_load_fixture_file() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(FIXTURE_JSON.as_bytes())?;

    let provider = InMemoryProvider::load_fixture(file.path())?;

    let tx = provider.get_transaction("aa").await?.expect("fixture transaction");
    assert_eq!(tx.block_height, Some(10));
    assert!(tx.is_confirmed());
    assert_eq!(tx.inputs[0].prev_hash.as_deref(), Some("99"));

    assert_eq!(
        provider.get_address_references("A").await?,
        vec![AddressReference::unconfirmed("bb")]
    );
    // Derived from transactions when not listed explicitly
    assert_eq!(
        provider.get_address_references("S").await?,
        vec![AddressReference::confirmed("aa", 10)]
    );
    Ok(())
}

#[test]
fn test_malformed_fixture_is_invalid_data() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(b"{ \"transactions\": 5 }")?;

    let result = InMemoryProvider::load_fixture(file.path());
    assert!(matches!(result, Err(AppError::InvalidData(_))));
    Ok(())
}

#[test]
fn test_fixture_fields_default_to_empty() -> Result<()> {
    let fixture: LedgerFixture = serde_json::from_str("{}")?;
    assert!(fixture.transactions.is_empty());
    assert!(fixture.references.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_not_found_is_data() -> Result<()> {
    let provider = forward_scenario();

    assert!(provider.get_transaction(&hash(42)).await?.is_none());
    assert!(provider.get_address_references("nobody").await?.is_empty());
    assert!(provider.get_address_activity("nobody", 10).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_activity_respects_limit() -> Result<()> {
    let activity = forward_scenario()
        .get_address_activity("A", 1)
        .await?
        .expect("A has activity");

    assert_eq!(activity.summary.n_tx, 3);
    assert_eq!(activity.summary.total_received, 12);
    assert_eq!(activity.summary.total_sent, 5);
    assert_eq!(activity.transactions.len(), 1);
    Ok(())
}

#[test]
fn test_cache_clones_share_storage() {
    let cache: ProviderCache<u64> = ProviderCache::new("test");
    let other = cache.clone();

    assert_eq!(cache.get("k"), None);
    other.put("k".to_string(), 7);
    assert_eq!(cache.get("k"), Some(7));

    let stats = cache.get_stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
    assert_eq!(other.len(), 1);
}
