// Enrichment outcomes and the ranked report

use crate::domain::address::TokenAddress;
use serde::{Deserialize, Serialize};

/// Why an address produced no holder count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    InvalidFormat,
    NotIndexed,
    FetchFailed,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::InvalidFormat => write!(f, "invalid address format"),
            SkipReason::NotIndexed => write!(f, "not indexed on provider"),
            SkipReason::FetchFailed => write!(f, "failed to fetch holders"),
        }
    }
}

/// A pool with its fetched holder count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStanding {
    pub address: TokenAddress,
    pub holders: u64,
}

/// An input address that was dropped, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAddress {
    pub address: String,
    pub reason: SkipReason,
}

/// Result of enriching a batch of addresses
///
/// Every input lands in exactly one of the two partitions.
#[derive(Debug, Default, Serialize)]
pub struct EnrichmentReport {
    pub ranked: Vec<PoolStanding>,
    pub skipped: Vec<SkippedAddress>,
}

impl EnrichmentReport {
    pub fn record_holders(&mut self, address: TokenAddress, holders: u64) {
        self.ranked.push(PoolStanding { address, holders });
    }

    pub fn record_skip(&mut self, address: impl Into<String>, reason: SkipReason) {
        self.skipped.push(SkippedAddress {
            address: address.into(),
            reason,
        });
    }

    /// Sort successes ascending by holder count (stable: ties keep input order)
    pub fn finalize(&mut self) {
        self.ranked.sort_by_key(|standing| standing.holders);
    }

    pub fn total(&self) -> usize {
        self.ranked.len() + self.skipped.len()
    }
}
