// Token address value object

use crate::domain::error::DomainError;
use serde::Serialize;

/// Normalized EVM token address: lower-case, `0x` prefix, 40 hex digits
///
/// Parsing is the only constructor, so holding a `TokenAddress` is proof the
/// format check already passed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TokenAddress(String);

impl TokenAddress {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_ascii_lowercase();
        let digits = normalized
            .strip_prefix("0x")
            .ok_or_else(|| DomainError::InvalidAddress(raw.to_string()))?;

        if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidAddress(raw.to_string()));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
