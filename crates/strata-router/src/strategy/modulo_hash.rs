//! Modulo Hash Strategy
//!
//! Ring-free alternative: fold the key's hash, spread the high bits into
//! the low ones, and mask into the flat `db * tb` index space. Constant
//! time and no allocation beyond the context strings, at the cost of
//! remapping nearly every key when the shard grid changes size.

use tracing::{trace, warn};

use strata_core::{RouterConfig, RoutingContext};

use super::RouteStrategy;
use crate::error::RouterError;
use crate::hash::fold_hash;
use crate::types::PhysicalNode;

/// Bitmask routing strategy.
///
/// The mask step `(size - 1) & h` is only uniform when `size` is a power
/// of two; other sizes still route but skew toward the low shards.
pub struct ModuloHashStrategy {
    config: RouterConfig,
}

impl ModuloHashStrategy {
    pub fn new(config: RouterConfig) -> Self {
        let size = config.physical_nodes();
        if size > 0 && !size.is_power_of_two() {
            warn!(
                size,
                "db_count * tb_count is not a power of two; modulo distribution degrades"
            );
        }
        Self { config }
    }
}

impl RouteStrategy for ModuloHashStrategy {
    fn route(&self, key: &str, ctx: &mut RoutingContext) -> Result<PhysicalNode, RouterError> {
        let size = self.config.db_count * self.config.tb_count;
        if size == 0 {
            return Err(RouterError::EmptyTopology);
        }

        let h = fold_hash(key);
        let idx = (size - 1) & (h ^ (h >> 16));

        let node = PhysicalNode::new(idx / self.config.tb_count + 1, idx % self.config.tb_count);

        ctx.set_db_key(node.db_key());
        ctx.set_tb_key(node.tb_key());
        trace!(key, node = %node, "modulo hash routing");

        Ok(node)
    }

    fn db_count(&self) -> u32 {
        self.config.db_count
    }

    fn tb_count(&self) -> u32 {
        self.config.tb_count
    }

    fn name(&self) -> &'static str {
        "ModuloHash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(db_count: u32, tb_count: u32) -> ModuloHashStrategy {
        ModuloHashStrategy::new(RouterConfig::new(db_count, tb_count, "userId"))
    }

    #[test]
    fn test_deterministic() {
        let s = strategy(2, 4);
        let mut ctx = RoutingContext::new();

        let first = s.route("fustackgiii", &mut ctx).unwrap();
        for _ in 0..100 {
            assert_eq!(s.route("fustackgiii", &mut ctx).unwrap(), first);
        }
    }

    #[test]
    fn test_index_arithmetic_covers_grid() {
        let s = strategy(2, 4);
        let mut ctx = RoutingContext::new();

        for i in 0..1000 {
            let node = s.route(&format!("user-{}", i), &mut ctx).unwrap();
            assert!((1..=2).contains(&node.db_idx));
            assert!(node.tb_idx < 4);
        }
    }

    #[test]
    fn test_flat_index_reconstruction() {
        // db/tb split must be a bijection with the flat index space
        let s = strategy(4, 8);
        let mut ctx = RoutingContext::new();

        for i in 0..1000 {
            let node = s.route(&format!("key-{}", i), &mut ctx).unwrap();
            let flat = (node.db_idx - 1) * 8 + node.tb_idx;
            assert!(flat < 32);
        }
    }

    #[test]
    fn test_power_of_two_reaches_every_shard() {
        let s = strategy(2, 4);
        let mut ctx = RoutingContext::new();
        let mut seen = std::collections::HashSet::new();

        for i in 0..10_000 {
            seen.insert(s.route(&format!("user-{}", i), &mut ctx).unwrap());
        }
        assert_eq!(seen.len(), 8, "all 8 shards should receive traffic");
    }

    #[test]
    fn test_empty_topology_fails_fast() {
        let s = strategy(0, 0);
        let mut ctx = RoutingContext::new();

        assert!(matches!(
            s.route("any", &mut ctx),
            Err(RouterError::EmptyTopology)
        ));
    }

    #[test]
    fn test_writes_context() {
        let s = strategy(2, 4);
        let mut ctx = RoutingContext::new();

        let node = s.route("sws123", &mut ctx).unwrap();
        assert_eq!(ctx.db_key().unwrap(), node.db_key());
        assert_eq!(ctx.tb_key().unwrap(), node.tb_key());
    }
}
