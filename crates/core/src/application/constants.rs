// Pipeline constants (no magic values)
use std::time::Duration;

/// Fixed interval between execution status polls (5s)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Maximum status polls before giving up (120 polls = 10 minutes at the default interval)
pub const DEFAULT_MAX_POLLS: u32 = 120;

/// Maximum holder fetch attempts per address
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base delay for linear retry backoff (1s)
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Pause after each enriched address, to stay under provider rate limits (1s)
pub const INTER_ITEM_PAUSE: Duration = Duration::from_secs(1);

/// Result column holding the contract address
pub const DEFAULT_ADDRESS_FIELD: &str = "project_contract_address";
