// Port Layer - Interfaces for external dependencies

pub mod analytics;
pub mod sleeper; // For deterministic testing
pub mod token_data;

// Re-exports
pub use analytics::{AnalyticsApi, AnalyticsError};
pub use sleeper::{Sleeper, TokioSleeper};
pub use token_data::{TokenDataApi, TokenDataError};
