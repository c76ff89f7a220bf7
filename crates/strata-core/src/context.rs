//! Per-operation routing context
//!
//! One logical operation (an intercepted DAO call, typically) resolves to
//! one (database, table) shard. The context carries that decision from the
//! routing strategy to the datasource-switching and SQL-rewriting layers,
//! then is cleared when the operation completes.
//!
//! The context is an explicit value, not a thread-local: the caller owns
//! it and passes `&mut` into the router, so two concurrent operations can
//! never observe each other's decision regardless of how tasks are
//! scheduled. Execution units that pool and reuse a context must go
//! through [`RoutingContext::scope`], which clears the slot on every exit
//! path.

use std::ops::{Deref, DerefMut};

/// Routing decision slot for one logical operation.
///
/// `db_key` is the database suffix zero-padded to 2 digits ("01"),
/// `tb_key` the table suffix zero-padded to 3 digits ("003"). Both unset
/// until a strategy routes or a caller overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingContext {
    db_key: Option<String>,
    tb_key: Option<String>,
}

impl RoutingContext {
    /// Create an unset context
    pub fn new() -> Self {
        Self::default()
    }

    /// Database key, if a routing decision has been recorded
    pub fn db_key(&self) -> Option<&str> {
        self.db_key.as_deref()
    }

    /// Table key, if a routing decision has been recorded
    pub fn tb_key(&self) -> Option<&str> {
        self.tb_key.as_deref()
    }

    /// Whether both keys are set
    pub fn is_routed(&self) -> bool {
        self.db_key.is_some() && self.tb_key.is_some()
    }

    /// Record the database key
    pub fn set_db_key(&mut self, key: impl Into<String>) {
        self.db_key = Some(key.into());
    }

    /// Record the table key
    pub fn set_tb_key(&mut self, key: impl Into<String>) {
        self.tb_key = Some(key.into());
    }

    /// Reset both keys to unset.
    ///
    /// Strategies never call this; it is the caller's duty at the end of
    /// the logical operation, on success and failure alike.
    pub fn clear(&mut self) {
        self.db_key = None;
        self.tb_key = None;
    }

    /// Borrow the context for the duration of one logical operation.
    ///
    /// The returned guard derefs to the context and clears it when
    /// dropped, including during unwinding, so a pooled execution unit is
    /// always handed back with an unset slot.
    pub fn scope(&mut self) -> ContextGuard<'_> {
        ContextGuard { ctx: self }
    }
}

/// RAII guard over a borrowed [`RoutingContext`].
#[derive(Debug)]
pub struct ContextGuard<'a> {
    ctx: &'a mut RoutingContext,
}

impl Deref for ContextGuard<'_> {
    type Target = RoutingContext;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for ContextGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        self.ctx.clear();
    }
}
