//! Routing Strategies
//!
//! Two interchangeable implementations of the router contract:
//!
//! - `ConsistentHashStrategy`: virtual-node hash ring; resharding remaps
//!   only about `1 / physical_node_count` of the keys
//! - `ModuloHashStrategy`: bitmask over a folded hash; O(1) and
//!   allocation-free, but resharding remaps nearly every key
//!
//! The strategy is chosen once, from [`RouterConfig::strategy`], and held
//! behind `Box<dyn RouteStrategy>` for the lifetime of the router.

mod consistent_hash;
mod modulo_hash;

pub use consistent_hash::ConsistentHashStrategy;
pub use modulo_hash::ModuloHashStrategy;

use strata_core::{RouterConfig, RoutingContext, StrategyKind};

use crate::error::RouterError;
use crate::types::{format_db_key, format_tb_key, PhysicalNode};

/// Contract implemented by every routing strategy.
///
/// `route` and the direct overrides write into the caller-owned
/// [`RoutingContext`]; the shard-space accessors let the datasource layer
/// size its connection pools.
pub trait RouteStrategy: Send + Sync {
    /// Resolve the shard for a routing key and record it in the context.
    ///
    /// Fails with [`RouterError::EmptyTopology`] when the strategy was
    /// built over zero physical nodes.
    fn route(&self, key: &str, ctx: &mut RoutingContext) -> Result<PhysicalNode, RouterError>;

    /// Record a caller-chosen database index, bypassing hashing.
    ///
    /// The index is not validated against the configured shard space; the
    /// datasource layer owns that check.
    fn set_db_key(&self, ctx: &mut RoutingContext, db_idx: u32) {
        ctx.set_db_key(format_db_key(db_idx));
    }

    /// Record a caller-chosen table index, bypassing hashing.
    fn set_tb_key(&self, ctx: &mut RoutingContext, tb_idx: u32) {
        ctx.set_tb_key(format_tb_key(tb_idx));
    }

    /// Configured number of databases
    fn db_count(&self) -> u32;

    /// Configured number of tables per database
    fn tb_count(&self) -> u32;

    /// Reset the context at the end of the logical operation
    fn clear(&self, ctx: &mut RoutingContext) {
        ctx.clear();
    }

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}

/// Build the strategy selected by the configuration.
pub fn build_strategy(config: RouterConfig) -> Box<dyn RouteStrategy> {
    match config.strategy {
        StrategyKind::ConsistentHash => Box::new(ConsistentHashStrategy::new(config)),
        StrategyKind::ModuloHash => Box::new(ModuloHashStrategy::new(config)),
    }
}
