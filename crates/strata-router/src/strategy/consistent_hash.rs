//! Consistent Hash Strategy
//!
//! Routes a key to the physical node owning its position on a virtual-node
//! hash ring. Adding or removing a shard moves only the keys whose ring
//! arcs change hands, which is what makes resharding survivable for an
//! already-populated cluster.

use tracing::trace;

use strata_core::{RouterConfig, RoutingContext};

use super::RouteStrategy;
use crate::error::RouterError;
use crate::ring::HashRing;
use crate::types::PhysicalNode;

/// Ring-backed routing strategy.
///
/// The ring is built eagerly at construction and never touched again;
/// concurrent `route` calls share it without locking.
pub struct ConsistentHashStrategy {
    config: RouterConfig,
    ring: HashRing,
}

impl ConsistentHashStrategy {
    /// Build the ring for the configured shard grid
    pub fn new(config: RouterConfig) -> Self {
        let ring = HashRing::build(config.db_count, config.tb_count);
        Self { config, ring }
    }

    /// The frozen ring, mainly for inspection and tests
    pub fn ring(&self) -> &HashRing {
        &self.ring
    }
}

impl RouteStrategy for ConsistentHashStrategy {
    fn route(&self, key: &str, ctx: &mut RoutingContext) -> Result<PhysicalNode, RouterError> {
        let node = self.ring.locate(key).ok_or(RouterError::EmptyTopology)?;

        ctx.set_db_key(node.db_key());
        ctx.set_tb_key(node.tb_key());
        trace!(key, node = %node, "consistent hash routing");

        Ok(node)
    }

    fn db_count(&self) -> u32 {
        self.config.db_count
    }

    fn tb_count(&self) -> u32 {
        self.config.tb_count
    }

    fn name(&self) -> &'static str {
        "ConsistentHash"
    }
}
