// Dune Analytics adapter
// POST /query/{id}/execute, GET /execution/{id}/status, GET /execution/{id}/results

use crate::error_text;
use async_trait::async_trait;
use poolrank_core::domain::{ExecutionId, ExecutionState, QueryParameters, ResultRow};
use poolrank_core::port::{AnalyticsApi, AnalyticsError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Dune API v1 base URL
pub const DEFAULT_DUNE_BASE_URL: &str = "https://api.dune.com/api/v1";

/// Saved query listing pool contract addresses for a chain and time window
pub const DEFAULT_QUERY_ID: u64 = 5110969;

/// Execution performance tier requested from the service
pub const DEFAULT_PERFORMANCE: &str = "medium";

/// Connection settings for the Dune API
#[derive(Debug, Clone)]
pub struct DuneConfig {
    pub api_key: String,
    pub query_id: u64,
    pub performance: String,
    pub base_url: String,
}

impl DuneConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            query_id: DEFAULT_QUERY_ID,
            performance: DEFAULT_PERFORMANCE.to_string(),
            base_url: DEFAULT_DUNE_BASE_URL.to_string(),
        }
    }

    pub fn with_query_id(mut self, query_id: u64) -> Self {
        self.query_id = query_id;
        self
    }

    pub fn with_performance(mut self, performance: impl Into<String>) -> Self {
        self.performance = performance.into();
        self
    }
}

/// Dune Analytics client implementing the analytics port
///
/// Non-2xx responses are unconditional failures carrying the status and the
/// response body; there is no retry at this layer.
pub struct DuneClient {
    http: reqwest::Client,
    config: DuneConfig,
}

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    query_parameters: &'a QueryParameters,
    performance: &'a str,
}

#[derive(Deserialize)]
struct ExecuteResponse {
    execution_id: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    state: ExecutionState,
}

#[derive(Deserialize)]
struct ResultsResponse {
    result: ResultsPayload,
}

#[derive(Deserialize)]
struct ResultsPayload {
    rows: Vec<ResultRow>,
}

impl DuneClient {
    pub fn new(config: DuneConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("X-Dune-API-Key", &self.config.api_key)
    }
}

#[async_trait]
impl AnalyticsApi for DuneClient {
    async fn execute_query(
        &self,
        params: &QueryParameters,
    ) -> Result<ExecutionId, AnalyticsError> {
        let url = format!(
            "{}/query/{}/execute",
            self.config.base_url, self.config.query_id
        );
        debug!(%url, "Submitting query execution");

        let body = ExecuteRequest {
            query_parameters: params,
            performance: &self.config.performance,
        };
        let response = self
            .auth(self.http.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalyticsError::Submission(e.to_string()))?;
        if !response.status().is_success() {
            return Err(AnalyticsError::Submission(error_text(response).await));
        }

        let parsed: ExecuteResponse = response
            .json()
            .await
            .map_err(|e| AnalyticsError::Submission(e.to_string()))?;
        Ok(parsed.execution_id)
    }

    async fn execution_state(&self, id: &ExecutionId) -> Result<ExecutionState, AnalyticsError> {
        let url = format!("{}/execution/{}/status", self.config.base_url, id);

        let response = self
            .auth(self.http.get(&url))
            .send()
            .await
            .map_err(|e| AnalyticsError::Poll(e.to_string()))?;
        if !response.status().is_success() {
            return Err(AnalyticsError::Poll(error_text(response).await));
        }

        let parsed: StatusResponse = response
            .json()
            .await
            .map_err(|e| AnalyticsError::Poll(e.to_string()))?;
        Ok(parsed.state)
    }

    async fn execution_rows(&self, id: &ExecutionId) -> Result<Vec<ResultRow>, AnalyticsError> {
        let url = format!("{}/execution/{}/results", self.config.base_url, id);
        debug!(%url, "Fetching execution results");

        let response = self
            .auth(self.http.get(&url))
            .send()
            .await
            .map_err(|e| AnalyticsError::Fetch(e.to_string()))?;
        if !response.status().is_success() {
            return Err(AnalyticsError::Fetch(error_text(response).await));
        }

        let parsed: ResultsResponse = response
            .json()
            .await
            .map_err(|e| AnalyticsError::Fetch(e.to_string()))?;
        Ok(parsed.result.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_request_wire_shape() {
        let params = QueryParameters {
            blockchain_name: "gnosis".to_string(),
            number_of_days: 7,
        };
        let body = ExecuteRequest {
            query_parameters: &params,
            performance: "medium",
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["query_parameters"]["blockchain_name"], "gnosis");
        assert_eq!(json["query_parameters"]["number_of_days"], 7);
        assert_eq!(json["performance"], "medium");
    }

    #[test]
    fn test_execute_response_parsing() {
        let parsed: ExecuteResponse =
            serde_json::from_str(r#"{"execution_id": "01HXW", "state": "QUERY_STATE_PENDING"}"#)
                .unwrap();
        assert_eq!(parsed.execution_id, "01HXW");
    }

    #[test]
    fn test_status_response_parsing() {
        let parsed: StatusResponse = serde_json::from_str(
            r#"{"execution_id": "01HXW", "state": "QUERY_STATE_EXECUTING", "queue_position": 0}"#,
        )
        .unwrap();
        assert_eq!(parsed.state, ExecutionState::Pending);
    }

    #[test]
    fn test_results_response_parsing() {
        let parsed: ResultsResponse = serde_json::from_str(
            r#"{
                "execution_id": "01HXW",
                "state": "QUERY_STATE_COMPLETED",
                "result": {
                    "rows": [
                        {"project_contract_address": "0xaa", "tvl": 1.5},
                        {"project_contract_address": "0xbb"}
                    ],
                    "metadata": {"row_count": 2}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(parsed.result.rows.len(), 2);
        assert_eq!(
            parsed.result.rows[0].get_str("project_contract_address"),
            Some("0xaa")
        );
    }
}
