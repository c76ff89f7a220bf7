//! Strata Router - Shard Routing Module
//!
//! Maps a business routing key (a user id, typically) onto one of
//! `db_count x tb_count` physical (database, table) shards, so application
//! code can stay agnostic of the physical layout of a split logical table.
//!
//! # Architecture
//!
//! ```text
//! routing key ("sws123")
//!     │
//!     ▼
//! ┌─────────────────────────┐
//! │     RouteStrategy       │  ConsistentHash (ring) / ModuloHash (mask)
//! │   (Which shard?)        │
//! └───────────┬─────────────┘
//!             │
//!             ▼
//! ┌─────────────────────────┐
//! │    RoutingContext       │  db_key "01" / tb_key "003"
//! │   (Carry the decision)  │
//! └─────────────────────────┘
//!             │
//!             ▼
//!   datasource switch / SQL rewrite (external)
//! ```
//!
//! # Example
//!
//! ```rust
//! use strata_router::{build_strategy, RouteStrategy, RouterConfig, RoutingContext};
//!
//! let strategy = build_strategy(RouterConfig::new(4, 8, "userId"));
//!
//! let mut ctx = RoutingContext::new();
//! {
//!     let mut op = ctx.scope();
//!     let node = strategy.route("sws123", &mut op).unwrap();
//!     assert_eq!(op.db_key().unwrap(), node.db_key());
//! } // scope guard clears the context on every exit path
//! assert!(ctx.db_key().is_none());
//! ```

// Core modules
mod error;
mod hash;
mod ring;
mod types;

// Strategy module (contains both routing strategies)
mod strategy;

// Re-exports: Error types
pub use error::RouterError;

// Re-exports: Core types
pub use types::{format_db_key, format_tb_key, PhysicalNode};

// Re-exports: Ring
pub use ring::HashRing;

// Re-exports: Strategy trait and implementations
pub use strategy::{build_strategy, ConsistentHashStrategy, ModuloHashStrategy, RouteStrategy};

// Re-exports: Shared config and context from strata-core
pub use strata_core::{ContextGuard, RouterConfig, RoutingContext, StrategyKind};
