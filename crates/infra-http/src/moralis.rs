// Moralis token data adapter
// GET /erc20/metadata (indexing check), GET /erc20/{address}/owners (holder count)

use crate::error_text;
use async_trait::async_trait;
use poolrank_core::domain::TokenAddress;
use poolrank_core::port::{TokenDataApi, TokenDataError};
use serde::Deserialize;
use tracing::debug;

/// Moralis EVM API base URL
pub const DEFAULT_MORALIS_BASE_URL: &str = "https://deep-index.moralis.io/api/v2.2";

/// Chain identifier sent with every provider request
pub const DEFAULT_CHAIN: &str = "gnosis";

/// Connection settings for the Moralis API
#[derive(Debug, Clone)]
pub struct MoralisConfig {
    pub api_key: String,
    pub chain: String,
    pub base_url: String,
}

impl MoralisConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            chain: DEFAULT_CHAIN.to_string(),
            base_url: DEFAULT_MORALIS_BASE_URL.to_string(),
        }
    }

    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = chain.into();
        self
    }
}

/// Moralis client implementing the token data port
pub struct MoralisClient {
    http: reqwest::Client,
    config: MoralisConfig,
}

/// Owners endpoint payload; entry contents are opaque, only the collection
/// length matters
#[derive(Deserialize)]
struct OwnersResponse {
    result: Option<Vec<serde_json::Value>>,
}

impl MoralisClient {
    pub fn new(config: MoralisConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("X-API-Key", &self.config.api_key)
    }
}

#[async_trait]
impl TokenDataApi for MoralisClient {
    async fn is_indexed(&self, address: &TokenAddress) -> Result<bool, TokenDataError> {
        let url = format!("{}/erc20/metadata", self.config.base_url);

        let response = self
            .auth(self.http.get(&url))
            .query(&[
                ("chain", self.config.chain.as_str()),
                ("addresses[0]", address.as_str()),
            ])
            .send()
            .await
            .map_err(|e| TokenDataError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(TokenDataError::Request(error_text(response).await));
        }

        // The provider answers with one metadata entry per known address
        let entries: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| TokenDataError::UnexpectedResponse(e.to_string()))?;
        Ok(!entries.is_empty())
    }

    async fn holder_count(
        &self,
        address: &TokenAddress,
        limit: Option<u32>,
    ) -> Result<u64, TokenDataError> {
        let url = format!("{}/erc20/{}/owners", self.config.base_url, address);
        debug!(%url, ?limit, "Fetching token owners");

        let mut request = self
            .auth(self.http.get(&url))
            .query(&[("chain", self.config.chain.as_str())]);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TokenDataError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(TokenDataError::Request(error_text(response).await));
        }

        let parsed: OwnersResponse = response
            .json()
            .await
            .map_err(|e| TokenDataError::UnexpectedResponse(e.to_string()))?;
        let holders = parsed.result.ok_or_else(|| {
            TokenDataError::UnexpectedResponse("missing 'result' collection".to_string())
        })?;
        Ok(holders.len() as u64)
    }
}
