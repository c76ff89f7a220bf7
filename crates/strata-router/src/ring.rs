//! Virtual-node hash ring
//!
//! The ring is the shared, read-only half of consistent-hash routing: it
//! is built once when the strategy is constructed and never mutated, so
//! any number of concurrent lookups can proceed without locking.
//!
//! Construction goes through a `BTreeMap` (ordered, collision-checkable),
//! then freezes into two parallel arrays: the ascending hash keys for
//! binary search, and the physical node owning each position.

use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::hash::ring_hash;
use crate::types::PhysicalNode;

/// Immutable consistent-hash ring over the `(db, table)` shard grid.
#[derive(Debug, Clone)]
pub struct HashRing {
    /// Ring positions, ascending. Binary-searched on lookup.
    keys: Vec<u32>,
    /// Owner of each position, parallel to `keys`.
    nodes: Vec<PhysicalNode>,
    /// Virtual nodes placed per physical node.
    virtual_per_node: usize,
}

impl HashRing {
    /// Build the ring for a `db_count x tb_count` shard grid.
    ///
    /// Every physical node `(db_idx in 1..=db_count, tb_idx in
    /// 0..tb_count)` gets exactly `virtual_node_count` ring entries. Hash
    /// collisions between virtual-node names are resolved by renaming and
    /// rehashing, never by overwriting, so the entry count is exact.
    pub fn build(db_count: u32, tb_count: u32) -> Self {
        let physical_nodes = db_count as usize * tb_count as usize;
        let virtual_per_node = virtual_node_count(physical_nodes);

        let mut ring: BTreeMap<u32, PhysicalNode> = BTreeMap::new();
        for db_idx in 1..=db_count {
            for tb_idx in 0..tb_count {
                let node = PhysicalNode::new(db_idx, tb_idx);
                for k in 0..virtual_per_node {
                    insert_virtual_node(&mut ring, format!("{}_VN{}", node, k), node);
                }
            }
        }

        let keys: Vec<u32> = ring.keys().copied().collect();
        let nodes: Vec<PhysicalNode> = ring.values().copied().collect();

        info!(
            physical_nodes,
            virtual_nodes = keys.len(),
            "hash ring initialized"
        );

        Self {
            keys,
            nodes,
            virtual_per_node,
        }
    }

    /// Physical node owning the given routing key, or `None` if the ring
    /// is empty.
    pub fn locate(&self, key: &str) -> Option<PhysicalNode> {
        self.locate_hash(ring_hash(key))
    }

    /// Physical node owning the given ring position.
    ///
    /// Selects the first entry whose hash is >= `hash`; a position past
    /// the largest entry wraps around to the smallest (the ring is
    /// conceptually circular).
    pub fn locate_hash(&self, hash: u32) -> Option<PhysicalNode> {
        if self.keys.is_empty() {
            return None;
        }
        let pos = self.keys.partition_point(|&k| k < hash);
        let pos = if pos == self.keys.len() { 0 } else { pos };
        Some(self.nodes[pos])
    }

    /// Total number of ring entries (virtual nodes)
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the ring holds no entries
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Virtual nodes placed per physical node
    pub fn virtual_nodes_per_physical(&self) -> usize {
        self.virtual_per_node
    }

    /// Load histogram for a key sample.
    ///
    /// Useful for monitoring distribution balance and measuring remap
    /// rates across topology changes.
    pub fn distribution<I, S>(&self, keys: I) -> HashMap<PhysicalNode, usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut histogram = HashMap::new();
        for key in keys {
            if let Some(node) = self.locate(key.as_ref()) {
                *histogram.entry(node).or_insert(0) += 1;
            }
        }
        histogram
    }
}

/// Virtual-node density: `max(100, floor(50 * ln(physical + 1)))`.
///
/// Scales logarithmically with the cluster so the ring stays small while
/// distribution variance stays low for small grids.
fn virtual_node_count(physical_nodes: usize) -> usize {
    std::cmp::max(100, (50.0 * ((physical_nodes + 1) as f64).ln()) as usize)
}

/// Insert one virtual node, renaming past hash collisions.
fn insert_virtual_node(ring: &mut BTreeMap<u32, PhysicalNode>, mut name: String, node: PhysicalNode) {
    let mut hash = ring_hash(&name);
    while ring.contains_key(&hash) {
        name.push('\'');
        hash = ring_hash(&name);
    }
    ring.insert(hash, node);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ring() {
        let ring = HashRing::build(0, 8);
        assert!(ring.is_empty());
        assert_eq!(ring.locate("any"), None);

        let ring = HashRing::build(4, 0);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_exact_entry_count() {
        let ring = HashRing::build(2, 4);
        // 8 physical nodes, every one carries the full virtual-node quota
        assert_eq!(ring.len(), 8 * ring.virtual_nodes_per_physical());
        assert!(ring.virtual_nodes_per_physical() >= 100);
    }

    #[test]
    fn test_virtual_node_count_formula() {
        // small grids hit the floor of 100
        assert_eq!(virtual_node_count(1), 100);
        assert_eq!(virtual_node_count(7), 103);
        // ln(33) * 50 = 174.8
        assert_eq!(virtual_node_count(32), 174);
        // large grids scale logarithmically
        assert_eq!(virtual_node_count(1023), 346);
    }

    #[test]
    fn test_keys_sorted_and_unique() {
        let ring = HashRing::build(4, 8);
        assert!(ring.keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ring.keys.len(), ring.nodes.len());
    }

    #[test]
    fn test_lookup_in_range() {
        let ring = HashRing::build(4, 8);
        for i in 0..1000 {
            let node = ring.locate(&format!("user-{}", i)).unwrap();
            assert!((1..=4).contains(&node.db_idx));
            assert!(node.tb_idx < 8);
        }
    }

    #[test]
    fn test_wrap_around() {
        let ring = HashRing::build(4, 8);
        let top = *ring.keys.last().unwrap();
        let first_node = ring.nodes[0];

        // any position beyond the largest entry wraps to the smallest
        if top < u32::MAX {
            assert_eq!(ring.locate_hash(top + 1), Some(first_node));
        }
        assert_eq!(ring.locate_hash(u32::MAX), Some(first_node));

        // an exact hit on the smallest entry selects it too
        assert_eq!(ring.locate_hash(ring.keys[0]), Some(first_node));
    }

    #[test]
    fn test_exact_hit_selects_entry() {
        let ring = HashRing::build(2, 4);
        for (i, &key) in ring.keys.iter().enumerate().take(50) {
            assert_eq!(ring.locate_hash(key), Some(ring.nodes[i]));
        }
    }

    #[test]
    fn test_collision_renames_instead_of_dropping() {
        let node_a = PhysicalNode::new(1, 0);
        let node_b = PhysicalNode::new(2, 0);
        let mut ring = BTreeMap::new();

        // Occupy the slot the name would hash to, then insert the same
        // name for another node: the rename policy must find a new slot.
        let name = "01_000_VN0".to_string();
        ring.insert(ring_hash(&name), node_a);
        insert_virtual_node(&mut ring, name.clone(), node_b);

        assert_eq!(ring.len(), 2);
        assert_eq!(ring.get(&ring_hash(&name)), Some(&node_a));
        assert_eq!(ring.get(&ring_hash(&format!("{}'", name))), Some(&node_b));
    }

    #[test]
    fn test_build_deterministic() {
        let a = HashRing::build(4, 8);
        let b = HashRing::build(4, 8);
        assert_eq!(a.keys, b.keys);
        assert_eq!(a.nodes, b.nodes);
    }
}
