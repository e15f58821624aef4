// Enrichment - per-address holder-count lookups with bounded retry

use crate::application::constants::INTER_ITEM_PAUSE;
use crate::application::retry::RetryPolicy;
use crate::domain::{EnrichmentReport, SkipReason, TokenAddress};
use crate::port::{Sleeper, TokenDataApi};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Tunables for the enrichment pass
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Verify the provider indexes the token before fetching holders
    pub check_indexing: bool,
    /// Cap on holder entries requested per token (caps the count too)
    pub holder_limit: Option<u32>,
    /// Pause after each processed address
    pub inter_item_pause: Duration,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            check_indexing: true,
            holder_limit: None,
            inter_item_pause: INTER_ITEM_PAUSE,
        }
    }
}

/// Fetches holder counts for a batch of addresses
///
/// Provider failures are recovered per address: the failure is recorded in
/// the report's skipped partition and processing continues with the next
/// address.
pub struct HolderEnricher {
    provider: Arc<dyn TokenDataApi>,
    sleeper: Arc<dyn Sleeper>,
    retry: RetryPolicy,
    config: EnrichmentConfig,
}

impl HolderEnricher {
    pub fn new(provider: Arc<dyn TokenDataApi>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            provider,
            sleeper,
            retry: RetryPolicy::default(),
            config: EnrichmentConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_config(mut self, config: EnrichmentConfig) -> Self {
        self.config = config;
        self
    }

    /// Process addresses in input order, one at a time
    ///
    /// The returned report covers every input exactly once and its success
    /// partition is sorted ascending by holder count.
    pub async fn process<I>(&self, addresses: I) -> EnrichmentReport
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut report = EnrichmentReport::default();

        for raw in addresses {
            self.process_one(raw.as_ref(), &mut report).await;
            // Inter-item pause regardless of outcome, for provider rate limits
            self.sleeper.sleep(self.config.inter_item_pause).await;
        }

        report.finalize();
        info!(
            ranked = report.ranked.len(),
            skipped = report.skipped.len(),
            "Enrichment pass finished"
        );
        report
    }

    async fn process_one(&self, raw: &str, report: &mut EnrichmentReport) {
        let address = match TokenAddress::parse(raw) {
            Ok(address) => address,
            Err(_) => {
                warn!(address = raw, "Invalid token address format, skipping");
                report.record_skip(raw, SkipReason::InvalidFormat);
                return;
            }
        };

        if self.config.check_indexing && !self.is_indexed(&address).await {
            report.record_skip(address.as_str(), SkipReason::NotIndexed);
            return;
        }

        match self.fetch_with_retry(&address).await {
            Some(holders) => report.record_holders(address, holders),
            None => report.record_skip(address.as_str(), SkipReason::FetchFailed),
        }
    }

    /// Metadata lookup; a provider error counts as unindexed
    async fn is_indexed(&self, address: &TokenAddress) -> bool {
        match self.provider.is_indexed(address).await {
            Ok(true) => true,
            Ok(false) => {
                warn!(address = %address, "Token not indexed on provider, skipping");
                false
            }
            Err(error) => {
                warn!(address = %address, error = %error, "Metadata lookup failed, skipping");
                false
            }
        }
    }

    async fn fetch_with_retry(&self, address: &TokenAddress) -> Option<u64> {
        for attempt in 1..=self.retry.max_attempts() {
            info!(
                address = %address,
                attempt,
                max_attempts = self.retry.max_attempts(),
                "Fetching holder count"
            );

            match self
                .provider
                .holder_count(address, self.config.holder_limit)
                .await
            {
                Ok(holders) => {
                    info!(address = %address, holders, "Holder count fetched");
                    return Some(holders);
                }
                Err(error) => {
                    warn!(address = %address, attempt, error = %error, "Holder fetch attempt failed");
                    if self.retry.should_retry(attempt) {
                        let delay = self.retry.backoff_after(attempt);
                        info!(
                            address = %address,
                            delay_ms = delay.as_millis() as u64,
                            "Waiting before retrying"
                        );
                        self.sleeper.sleep(delay).await;
                    }
                }
            }
        }

        warn!(address = %address, attempts = self.retry.max_attempts(), "All holder fetch attempts failed");
        None
    }
}
