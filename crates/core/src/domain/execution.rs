// Query execution domain model

use serde::{Deserialize, Serialize};

/// Identifier the analytics service assigns to a submitted execution
pub type ExecutionId = String;

/// Remote execution state, as reported by the analytics service
///
/// The service also reports `QUERY_STATE_EXECUTING` between submission and
/// completion; it deserializes as `Pending` since both mean "keep polling".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionState {
    #[serde(rename = "QUERY_STATE_PENDING", alias = "QUERY_STATE_EXECUTING")]
    Pending,
    #[serde(rename = "QUERY_STATE_COMPLETED")]
    Completed,
    #[serde(rename = "QUERY_STATE_FAILED")]
    Failed,
    #[serde(rename = "QUERY_STATE_CANCELLED")]
    Cancelled,
    #[serde(rename = "QUERY_STATE_TIMED_OUT")]
    TimedOut,
}

impl ExecutionState {
    /// Terminal states never transition again
    pub fn is_terminal(&self) -> bool {
        *self != ExecutionState::Pending
    }
}

impl std::fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionState::Pending => write!(f, "QUERY_STATE_PENDING"),
            ExecutionState::Completed => write!(f, "QUERY_STATE_COMPLETED"),
            ExecutionState::Failed => write!(f, "QUERY_STATE_FAILED"),
            ExecutionState::Cancelled => write!(f, "QUERY_STATE_CANCELLED"),
            ExecutionState::TimedOut => write!(f, "QUERY_STATE_TIMED_OUT"),
        }
    }
}

/// Named scalar parameters sent with a query execution request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParameters {
    pub blockchain_name: String,
    pub number_of_days: u32,
}

/// One row of a completed execution's result set
///
/// Field names and values are opaque to the pipeline; callers pick out the
/// columns they care about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow(serde_json::Map<String, serde_json::Value>);

impl ResultRow {
    pub fn new(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.0.get(field)
    }

    /// String value of a field, if present and a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|value| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_wire_names_round_trip() {
        let json = serde_json::to_string(&ExecutionState::TimedOut).unwrap();
        assert_eq!(json, "\"QUERY_STATE_TIMED_OUT\"");

        let state: ExecutionState = serde_json::from_str("\"QUERY_STATE_COMPLETED\"").unwrap();
        assert_eq!(state, ExecutionState::Completed);
    }

    #[test]
    fn test_executing_deserializes_as_pending() {
        let state: ExecutionState = serde_json::from_str("\"QUERY_STATE_EXECUTING\"").unwrap();
        assert_eq!(state, ExecutionState::Pending);
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ExecutionState::Pending.is_terminal());
        assert!(ExecutionState::Completed.is_terminal());
        assert!(ExecutionState::Failed.is_terminal());
        assert!(ExecutionState::Cancelled.is_terminal());
        assert!(ExecutionState::TimedOut.is_terminal());
    }

    #[test]
    fn test_result_row_field_access() {
        let row: ResultRow = serde_json::from_str(
            r#"{"project_contract_address": "0xAbC", "tvl": 120.5}"#,
        )
        .unwrap();

        assert_eq!(row.get_str("project_contract_address"), Some("0xAbC"));
        assert_eq!(row.get_str("tvl"), None);
        assert!(row.get("missing").is_none());
    }
}
