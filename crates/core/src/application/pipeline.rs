// Ranked-holder pipeline
// One parameterized flow covering query discovery and enrichment

use crate::application::constants::DEFAULT_ADDRESS_FIELD;
use crate::application::enrichment::HolderEnricher;
use crate::application::poller::QueryPoller;
use crate::domain::{EnrichmentReport, QueryParameters, ResultRow};
use crate::error::{AppError, Result};
use tracing::{info, warn};

/// Chain and query-window settings for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Chain name passed to the analytics query
    pub chain: String,
    /// Query time window in days
    pub window_days: u32,
    /// Result column holding the contract address
    pub address_field: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chain: "gnosis".to_string(),
            window_days: 7,
            address_field: DEFAULT_ADDRESS_FIELD.to_string(),
        }
    }
}

/// Two-stage pipeline: discover pool addresses, enrich with holder counts
pub struct RankingPipeline {
    poller: QueryPoller,
    enricher: HolderEnricher,
    config: PipelineConfig,
}

impl RankingPipeline {
    pub fn new(poller: QueryPoller, enricher: HolderEnricher, config: PipelineConfig) -> Self {
        Self {
            poller,
            enricher,
            config,
        }
    }

    /// Run the analytics query and return its raw rows
    pub async fn query_rows(&self) -> Result<Vec<ResultRow>> {
        let params = QueryParameters {
            blockchain_name: self.config.chain.clone(),
            number_of_days: self.config.window_days,
        };
        Ok(self.poller.run(&params).await?)
    }

    /// Run the analytics query and extract pool addresses from its rows
    pub async fn discover(&self) -> Result<Vec<String>> {
        let rows = self.query_rows().await?;

        let addresses = extract_addresses(&rows, &self.config.address_field);
        if addresses.is_empty() && !rows.is_empty() {
            return Err(AppError::Config(format!(
                "field '{}' missing from every result row",
                self.config.address_field
            )));
        }

        info!(pools = addresses.len(), "Pool addresses discovered");
        Ok(addresses)
    }

    /// Fetch holder counts for a known address list
    pub async fn enrich<I>(&self, addresses: I) -> EnrichmentReport
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.enricher.process(addresses).await
    }

    /// Discover then enrich
    pub async fn run(&self) -> Result<EnrichmentReport> {
        let addresses = self.discover().await?;
        Ok(self.enrich(addresses).await)
    }
}

/// Pull the address column out of each row, lower-cased
fn extract_addresses(rows: &[ResultRow], field: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|row| match row.get_str(field) {
            Some(value) => Some(value.to_ascii_lowercase()),
            None => {
                warn!(field, "Result row missing address field, skipping row");
                None
            }
        })
        .collect()
}
