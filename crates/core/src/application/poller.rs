// Query execution polling
// Submit, poll until terminal, fetch rows

use crate::application::constants::{DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL};
use crate::domain::{ExecutionId, ExecutionState, QueryParameters, ResultRow};
use crate::port::{AnalyticsApi, AnalyticsError, Sleeper};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Drives a query execution to completion against the analytics port
pub struct QueryPoller {
    analytics: Arc<dyn AnalyticsApi>,
    sleeper: Arc<dyn Sleeper>,
    poll_interval: Duration,
    max_polls: u32,
}

impl QueryPoller {
    pub fn new(analytics: Arc<dyn AnalyticsApi>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            analytics,
            sleeper,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Bound on status polls; exceeding it fails with `AnalyticsError::Timeout`
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    /// Submit the query for execution
    pub async fn submit(&self, params: &QueryParameters) -> Result<ExecutionId, AnalyticsError> {
        let id = self.analytics.execute_query(params).await?;
        info!(
            execution_id = %id,
            chain = %params.blockchain_name,
            days = params.number_of_days,
            "Query execution submitted"
        );
        Ok(id)
    }

    /// Poll until the execution is terminal, then fetch its rows
    ///
    /// Status is checked immediately; the poll interval only elapses between
    /// non-terminal checks.
    ///
    /// # Errors
    /// - `AnalyticsError::Poll` if a status call fails
    /// - `AnalyticsError::ExecutionFailed` on a terminal non-completed state
    /// - `AnalyticsError::Timeout` once `max_polls` status checks have passed
    /// - `AnalyticsError::Fetch` if result retrieval fails
    pub async fn await_completion(
        &self,
        id: &ExecutionId,
    ) -> Result<Vec<ResultRow>, AnalyticsError> {
        let mut polls = 0u32;
        loop {
            let state = self.analytics.execution_state(id).await?;
            polls += 1;
            info!(execution_id = %id, state = %state, polls, "Execution status");

            if state == ExecutionState::Completed {
                break;
            }
            if state.is_terminal() {
                return Err(AnalyticsError::ExecutionFailed(state));
            }
            if polls >= self.max_polls {
                return Err(AnalyticsError::Timeout {
                    id: id.clone(),
                    polls,
                });
            }

            self.sleeper.sleep(self.poll_interval).await;
        }

        let rows = self.analytics.execution_rows(id).await?;
        info!(execution_id = %id, rows = rows.len(), "Execution results fetched");
        Ok(rows)
    }

    /// Submit and wait for rows in one call
    pub async fn run(&self, params: &QueryParameters) -> Result<Vec<ResultRow>, AnalyticsError> {
        let id = self.submit(params).await?;
        self.await_completion(&id).await
    }
}
