//! Unit tests for the enrichment pass

use crate::application::enrichment::{EnrichmentConfig, HolderEnricher};
use crate::application::retry::RetryPolicy;
use crate::domain::SkipReason;
use crate::port::sleeper::mocks::RecordingSleeper;
use crate::port::token_data::mocks::{HolderBehavior, MockTokenData};
use std::sync::Arc;
use std::time::Duration;

const ADDR_A: &str = "0xdd439304a77f54b1f7854751ac1169b279591ef7";
const ADDR_B: &str = "0xbc2acf5e821c5c9f8667a36bb1131dad26ed64f9";
const ADDR_C: &str = "0xbad20c15a773bf03ab973302f61fabcea5101f0a";

const PAUSE: Duration = Duration::from_secs(9);

/// Inter-item pause distinct from the retry base delay, so sleep sequences
/// are unambiguous in assertions
fn test_config() -> EnrichmentConfig {
    EnrichmentConfig {
        inter_item_pause: PAUSE,
        ..Default::default()
    }
}

fn enricher(provider: Arc<MockTokenData>, sleeper: Arc<RecordingSleeper>) -> HolderEnricher {
    HolderEnricher::new(provider, sleeper)
        .with_retry(RetryPolicy::new(3, Duration::from_secs(1)))
        .with_config(test_config())
}

#[tokio::test]
async fn test_invalid_address_skipped_without_network_call() {
    let provider = Arc::new(MockTokenData::new());
    let sleeper = Arc::new(RecordingSleeper::new());
    let report = enricher(provider.clone(), sleeper)
        .process(["0xshort", "dd439304a77f54b1f7854751ac1169b279591ef7"])
        .await;

    assert!(report.ranked.is_empty());
    assert_eq!(report.skipped.len(), 2);
    assert!(report
        .skipped
        .iter()
        .all(|s| s.reason == SkipReason::InvalidFormat));
    assert!(provider.metadata_calls().is_empty());
    assert!(provider.holder_calls().is_empty());
}

#[tokio::test]
async fn test_every_input_lands_in_exactly_one_partition() {
    let provider = Arc::new(
        MockTokenData::new()
            .with_count(ADDR_A, 10)
            .with_behavior(ADDR_B, HolderBehavior::AlwaysFail)
            .with_unindexed(ADDR_C),
    );
    let sleeper = Arc::new(RecordingSleeper::new());
    let inputs = [ADDR_A, "bogus", ADDR_B, ADDR_C];
    let report = enricher(provider, sleeper).process(inputs).await;

    assert_eq!(report.total(), inputs.len());
    assert_eq!(report.ranked.len(), 1);
    assert_eq!(report.skipped.len(), 3);

    // No address appears in both partitions
    for standing in &report.ranked {
        assert!(!report
            .skipped
            .iter()
            .any(|s| s.address == standing.address.as_str()));
    }
}

#[tokio::test]
async fn test_transient_failures_retried_until_success() {
    let provider = Arc::new(MockTokenData::new().with_behavior(
        ADDR_A,
        HolderBehavior::FailThenCount {
            failures: 2,
            count: 7,
        },
    ));
    let sleeper = Arc::new(RecordingSleeper::new());
    let report = enricher(provider.clone(), sleeper.clone())
        .process([ADDR_A])
        .await;

    assert_eq!(report.ranked.len(), 1);
    assert_eq!(report.ranked[0].holders, 7);
    // Attempts 1 and 2 fail, attempt 3 succeeds
    assert_eq!(provider.holder_calls().len(), 3);
    // Linear backoff after each failed attempt, then the inter-item pause
    assert_eq!(
        sleeper.durations(),
        vec![Duration::from_secs(1), Duration::from_secs(2), PAUSE]
    );
}

#[tokio::test]
async fn test_exhausted_retries_record_fetch_failed() {
    let provider =
        Arc::new(MockTokenData::new().with_behavior(ADDR_A, HolderBehavior::AlwaysFail));
    let sleeper = Arc::new(RecordingSleeper::new());
    let report = enricher(provider.clone(), sleeper.clone())
        .process([ADDR_A])
        .await;

    assert!(report.ranked.is_empty());
    assert_eq!(report.skipped[0].reason, SkipReason::FetchFailed);
    assert_eq!(provider.holder_calls().len(), 3);
    // No backoff after the final attempt
    assert_eq!(
        sleeper.durations(),
        vec![Duration::from_secs(1), Duration::from_secs(2), PAUSE]
    );
}

#[tokio::test]
async fn test_first_attempt_success_needs_no_backoff() {
    let provider = Arc::new(MockTokenData::new().with_count(ADDR_A, 4));
    let sleeper = Arc::new(RecordingSleeper::new());
    let report = enricher(provider.clone(), sleeper.clone())
        .process([ADDR_A])
        .await;

    assert_eq!(report.ranked[0].holders, 4);
    assert_eq!(provider.holder_calls().len(), 1);
    assert_eq!(sleeper.durations(), vec![PAUSE]);
}

#[tokio::test]
async fn test_unindexed_token_skipped_before_holder_fetch() {
    let provider = Arc::new(MockTokenData::new().with_unindexed(ADDR_A));
    let sleeper = Arc::new(RecordingSleeper::new());
    let report = enricher(provider.clone(), sleeper).process([ADDR_A]).await;

    assert_eq!(report.skipped[0].reason, SkipReason::NotIndexed);
    assert_eq!(provider.metadata_calls(), vec![ADDR_A.to_string()]);
    assert!(provider.holder_calls().is_empty());
}

#[tokio::test]
async fn test_metadata_error_counts_as_unindexed() {
    let provider = Arc::new(MockTokenData::new().with_failing_metadata());
    let sleeper = Arc::new(RecordingSleeper::new());
    let report = enricher(provider.clone(), sleeper).process([ADDR_A]).await;

    assert_eq!(report.skipped[0].reason, SkipReason::NotIndexed);
    assert!(provider.holder_calls().is_empty());
}

#[tokio::test]
async fn test_indexing_check_can_be_disabled() {
    let provider = Arc::new(MockTokenData::new().with_count(ADDR_A, 2));
    let sleeper = Arc::new(RecordingSleeper::new());
    let config = EnrichmentConfig {
        check_indexing: false,
        ..test_config()
    };
    let report = HolderEnricher::new(provider.clone(), sleeper)
        .with_config(config)
        .process([ADDR_A])
        .await;

    assert_eq!(report.ranked.len(), 1);
    assert!(provider.metadata_calls().is_empty());
}

#[tokio::test]
async fn test_inter_item_pause_after_every_address() {
    let provider = Arc::new(MockTokenData::new().with_count(ADDR_A, 1));
    let sleeper = Arc::new(RecordingSleeper::new());
    // One invalid and one valid input: both get the pause
    enricher(provider, sleeper.clone())
        .process(["bad", ADDR_A])
        .await;

    assert_eq!(sleeper.durations(), vec![PAUSE, PAUSE]);
}

#[tokio::test]
async fn test_report_sorted_ascending_by_holder_count() {
    let provider = Arc::new(
        MockTokenData::new()
            .with_count(ADDR_A, 5)
            .with_count(ADDR_B, 1)
            .with_count(ADDR_C, 3),
    );
    let sleeper = Arc::new(RecordingSleeper::new());
    let report = enricher(provider, sleeper)
        .process([ADDR_A, ADDR_B, ADDR_C])
        .await;

    let counts: Vec<u64> = report.ranked.iter().map(|s| s.holders).collect();
    assert_eq!(counts, vec![1, 3, 5]);
    assert_eq!(report.ranked[0].address.as_str(), ADDR_B);
    assert_eq!(report.ranked[1].address.as_str(), ADDR_C);
    assert_eq!(report.ranked[2].address.as_str(), ADDR_A);
}
