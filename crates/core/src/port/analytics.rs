// Analytics service port
// Submit a query execution, poll its status, fetch result rows

use crate::domain::{ExecutionId, ExecutionState, QueryParameters, ResultRow};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the analytics service and the polling loop around it
///
/// Submission/Poll/Fetch wrap transport failures or non-success responses;
/// ExecutionFailed and Timeout are produced by the polling layer. All of them
/// are fatal to the run.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Query submission failed: {0}")]
    Submission(String),

    #[error("Status poll failed: {0}")]
    Poll(String),

    #[error("Execution ended in state {0}")]
    ExecutionFailed(ExecutionState),

    #[error("Result fetch failed: {0}")]
    Fetch(String),

    #[error("Execution {id} not terminal after {polls} polls")]
    Timeout { id: ExecutionId, polls: u32 },
}

/// Analytics service port
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// Submit a query execution, returning the service-assigned id
    ///
    /// # Errors
    /// - `AnalyticsError::Submission` if the remote call does not succeed
    async fn execute_query(&self, params: &QueryParameters)
        -> Result<ExecutionId, AnalyticsError>;

    /// Current state of a submitted execution
    ///
    /// # Errors
    /// - `AnalyticsError::Poll` if the status call itself fails
    async fn execution_state(&self, id: &ExecutionId) -> Result<ExecutionState, AnalyticsError>;

    /// Result rows of a completed execution
    ///
    /// # Errors
    /// - `AnalyticsError::Fetch` if result retrieval fails
    async fn execution_rows(&self, id: &ExecutionId) -> Result<Vec<ResultRow>, AnalyticsError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted analytics service for tests
    ///
    /// Plays back a fixed sequence of poll states; once only one state
    /// remains it repeats forever (useful for never-completing executions).
    pub struct ScriptedAnalytics {
        execution_id: ExecutionId,
        states: Mutex<VecDeque<ExecutionState>>,
        rows: Vec<ResultRow>,
        fail_submit: bool,
        fail_poll: bool,
        fail_fetch: bool,
        status_calls: Mutex<usize>,
        fetch_calls: Mutex<usize>,
    }

    impl ScriptedAnalytics {
        pub fn new(states: Vec<ExecutionState>, rows: Vec<ResultRow>) -> Self {
            Self {
                execution_id: "01JMOCKEXEC".to_string(),
                states: Mutex::new(states.into()),
                rows,
                fail_submit: false,
                fail_poll: false,
                fail_fetch: false,
                status_calls: Mutex::new(0),
                fetch_calls: Mutex::new(0),
            }
        }

        pub fn failing_submission() -> Self {
            let mut mock = Self::new(vec![ExecutionState::Pending], Vec::new());
            mock.fail_submit = true;
            mock
        }

        pub fn failing_poll() -> Self {
            let mut mock = Self::new(vec![ExecutionState::Pending], Vec::new());
            mock.fail_poll = true;
            mock
        }

        pub fn failing_fetch(states: Vec<ExecutionState>) -> Self {
            let mut mock = Self::new(states, Vec::new());
            mock.fail_fetch = true;
            mock
        }

        pub fn status_calls(&self) -> usize {
            *self.status_calls.lock().unwrap()
        }

        pub fn fetch_calls(&self) -> usize {
            *self.fetch_calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl AnalyticsApi for ScriptedAnalytics {
        async fn execute_query(
            &self,
            _params: &QueryParameters,
        ) -> Result<ExecutionId, AnalyticsError> {
            if self.fail_submit {
                return Err(AnalyticsError::Submission(
                    "scripted submission failure".to_string(),
                ));
            }
            Ok(self.execution_id.clone())
        }

        async fn execution_state(
            &self,
            _id: &ExecutionId,
        ) -> Result<ExecutionState, AnalyticsError> {
            *self.status_calls.lock().unwrap() += 1;
            if self.fail_poll {
                return Err(AnalyticsError::Poll("scripted poll failure".to_string()));
            }

            let mut states = self.states.lock().unwrap();
            let state = if states.len() > 1 {
                states.pop_front().expect("non-empty state script")
            } else {
                *states.front().expect("state script must not be empty")
            };
            Ok(state)
        }

        async fn execution_rows(&self, _id: &ExecutionId) -> Result<Vec<ResultRow>, AnalyticsError> {
            *self.fetch_calls.lock().unwrap() += 1;
            if self.fail_fetch {
                return Err(AnalyticsError::Fetch("scripted fetch failure".to_string()));
            }
            Ok(self.rows.clone())
        }
    }
}
