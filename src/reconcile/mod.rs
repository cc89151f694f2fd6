//! Stock reconciliation for previously crawled tables
//!
//! A refresh pass reads the `(link, stock)` projection of a row range,
//! re-reads each product page's live quantity, and writes back to the
//! table. By default only rows that are *still* unresolved after the pass
//! are written; quantities that were resolved stay in memory and are
//! reported but not persisted unless `WritePolicy::IncludeResolved` is
//! chosen.

mod reconciler;

pub use reconciler::{
    apply_quantities, pending_updates, run_refresh, StockReconciler, WritePolicy,
};
