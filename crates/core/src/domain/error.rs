// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid token address: {0}")]
    InvalidAddress(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
