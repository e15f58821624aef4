// Application Layer - Pipeline use cases

pub mod constants;
pub mod enrichment;
pub mod pipeline;
pub mod poller;
pub mod retry;

#[cfg(test)]
mod enrichment_test;

// Re-exports
pub use enrichment::{EnrichmentConfig, HolderEnricher};
pub use pipeline::{PipelineConfig, RankingPipeline};
pub use poller::QueryPoller;
pub use retry::RetryPolicy;
