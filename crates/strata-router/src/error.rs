//! Error types for the router module

use thiserror::Error;

use strata_core::UnknownStrategy;

/// Router error types
#[derive(Debug, Error)]
pub enum RouterError {
    /// The shard topology has no physical nodes
    #[error("shard topology is empty: db_count * tb_count == 0")]
    EmptyTopology,

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<UnknownStrategy> for RouterError {
    fn from(err: UnknownStrategy) -> Self {
        RouterError::InvalidConfig(err.to_string())
    }
}
