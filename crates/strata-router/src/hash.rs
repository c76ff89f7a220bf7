//! Hash functions backing the two routing strategies.
//!
//! The ring hash and the key hash must come from the same function so key
//! space and node space are comparable; `ring_hash` serves both sides.
//! Both functions are fully deterministic across processes and platforms,
//! which is what makes routing decisions stable across restarts.

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

use twox_hash::XxHash32;

/// 32-bit non-cryptographic hash used for virtual-node placement and key
/// lookup on the ring.
pub fn ring_hash(key: &str) -> u32 {
    let mut hasher = XxHash32::with_seed(0);
    hasher.write(key.as_bytes());
    hasher.finish() as u32
}

/// Hash for the modulo strategy, folded from 64 to 32 bits.
pub fn fold_hash(key: &str) -> u32 {
    let mut hasher = DefaultHasher::new();
    hasher.write(key.as_bytes());
    let h = hasher.finish();
    (h ^ (h >> 32)) as u32
}
