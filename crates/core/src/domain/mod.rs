// Domain Layer - Pure business logic and entities

pub mod address;
pub mod error;
pub mod execution;
pub mod outcome;

// Re-exports
pub use address::TokenAddress;
pub use error::DomainError;
pub use execution::{ExecutionId, ExecutionState, QueryParameters, ResultRow};
pub use outcome::{EnrichmentReport, PoolStanding, SkipReason, SkippedAddress};
