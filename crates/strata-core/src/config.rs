//! Configuration module for the sharding router

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which routing algorithm a router is built with.
///
/// Selected once at configuration time; the router holds the resulting
/// strategy for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    /// Virtual-node hash ring. Resharding remaps roughly
    /// `1 / physical_node_count` of the keys.
    ConsistentHash,
    /// Bitmask over a folded hash. O(1) and allocation-free, but
    /// resharding remaps nearly every key.
    ModuloHash,
}

impl Default for StrategyKind {
    fn default() -> Self {
        Self::ConsistentHash
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::ConsistentHash => write!(f, "consistentHash"),
            StrategyKind::ModuloHash => write!(f, "moduloHash"),
        }
    }
}

/// Error for a strategy name that names no known strategy.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown routing strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consistentHash" | "consistent-hash" => Ok(StrategyKind::ConsistentHash),
            "moduloHash" | "modulo-hash" => Ok(StrategyKind::ModuloHash),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

/// Router configuration
///
/// Owned by the caller, handed to the router once at construction and
/// never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterConfig {
    /// Number of physical databases (indices start at 1)
    pub db_count: u32,

    /// Number of tables per database (indices start at 0)
    pub tb_count: u32,

    /// Name of the business field whose value is the routing key
    pub router_key: String,

    /// Routing algorithm
    #[serde(default)]
    pub strategy: StrategyKind,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            db_count: 2,
            tb_count: 4,
            router_key: "uid".to_string(),
            strategy: StrategyKind::default(),
        }
    }
}

impl RouterConfig {
    /// Create a config with the default consistent-hash strategy
    pub fn new(db_count: u32, tb_count: u32, router_key: impl Into<String>) -> Self {
        Self {
            db_count,
            tb_count,
            router_key: router_key.into(),
            strategy: StrategyKind::default(),
        }
    }

    /// Select a routing strategy
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Total number of physical (database, table) shards
    pub fn physical_nodes(&self) -> usize {
        self.db_count as usize * self.tb_count as usize
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = RouterConfig::default();

        if let Ok(db_count) = std::env::var("DB_COUNT") {
            if let Ok(db_count) = db_count.parse() {
                config.db_count = db_count;
            }
        }

        if let Ok(tb_count) = std::env::var("TB_COUNT") {
            if let Ok(tb_count) = tb_count.parse() {
                config.tb_count = tb_count;
            }
        }

        if let Ok(router_key) = std::env::var("ROUTER_KEY") {
            config.router_key = router_key;
        }

        if let Ok(strategy) = std::env::var("ROUTER_STRATEGY") {
            if let Ok(strategy) = strategy.parse() {
                config.strategy = strategy;
            }
        }

        config
    }
}
