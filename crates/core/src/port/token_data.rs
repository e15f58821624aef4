// Token data provider port
// Metadata (indexing) lookups and holder-count fetches

use crate::domain::TokenAddress;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the token data provider
#[derive(Error, Debug)]
pub enum TokenDataError {
    #[error("Provider request failed: {0}")]
    Request(String),

    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

/// Token data provider port
#[async_trait]
pub trait TokenDataApi: Send + Sync {
    /// Whether the provider has the token indexed at all
    async fn is_indexed(&self, address: &TokenAddress) -> Result<bool, TokenDataError>;

    /// Number of holder entries the provider returns for the token
    ///
    /// When `limit` is set the provider caps the returned collection, which
    /// caps the count as well.
    async fn holder_count(
        &self,
        address: &TokenAddress,
        limit: Option<u32>,
    ) -> Result<u64, TokenDataError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Per-address behavior of the mock provider
    #[derive(Debug, Clone)]
    pub enum HolderBehavior {
        /// Succeed with this count
        Count(u64),
        /// Fail this many times, then succeed with the count
        FailThenCount { failures: u32, count: u64 },
        /// Every attempt fails
        AlwaysFail,
    }

    /// Mock token data provider with recorded calls
    #[derive(Default)]
    pub struct MockTokenData {
        behaviors: Mutex<HashMap<String, HolderBehavior>>,
        unindexed: Vec<String>,
        fail_metadata: bool,
        metadata_calls: Mutex<Vec<String>>,
        holder_calls: Mutex<Vec<String>>,
    }

    impl MockTokenData {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_count(self, address: &str, count: u64) -> Self {
            self.with_behavior(address, HolderBehavior::Count(count))
        }

        pub fn with_behavior(self, address: &str, behavior: HolderBehavior) -> Self {
            self.behaviors
                .lock()
                .unwrap()
                .insert(address.to_string(), behavior);
            self
        }

        pub fn with_unindexed(mut self, address: &str) -> Self {
            self.unindexed.push(address.to_string());
            self
        }

        pub fn with_failing_metadata(mut self) -> Self {
            self.fail_metadata = true;
            self
        }

        /// Addresses the metadata endpoint was asked about, in call order
        pub fn metadata_calls(&self) -> Vec<String> {
            self.metadata_calls.lock().unwrap().clone()
        }

        /// Addresses the holder endpoint was asked about, one entry per attempt
        pub fn holder_calls(&self) -> Vec<String> {
            self.holder_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TokenDataApi for MockTokenData {
        async fn is_indexed(&self, address: &TokenAddress) -> Result<bool, TokenDataError> {
            self.metadata_calls
                .lock()
                .unwrap()
                .push(address.as_str().to_string());
            if self.fail_metadata {
                return Err(TokenDataError::Request(
                    "scripted metadata failure".to_string(),
                ));
            }
            Ok(!self.unindexed.contains(&address.as_str().to_string()))
        }

        async fn holder_count(
            &self,
            address: &TokenAddress,
            _limit: Option<u32>,
        ) -> Result<u64, TokenDataError> {
            self.holder_calls
                .lock()
                .unwrap()
                .push(address.as_str().to_string());

            let mut behaviors = self.behaviors.lock().unwrap();
            match behaviors.get_mut(address.as_str()) {
                None => Err(TokenDataError::Request("unknown token".to_string())),
                Some(HolderBehavior::Count(count)) => Ok(*count),
                Some(HolderBehavior::AlwaysFail) => Err(TokenDataError::Request(
                    "scripted holder failure".to_string(),
                )),
                Some(HolderBehavior::FailThenCount { failures, count }) => {
                    if *failures > 0 {
                        *failures -= 1;
                        Err(TokenDataError::Request(
                            "scripted transient failure".to_string(),
                        ))
                    } else {
                        Ok(*count)
                    }
                }
            }
        }
    }
}
