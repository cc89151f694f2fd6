//! State module for crawl output records
//!
//! # Components
//!
//! - `Stock`: tagged stock value (not a product, unresolved, known quantity)
//! - `CategoryNode`: one row of crawl output, category or product
//! - `ResultList`: append-only accumulator for a single crawl run
//! - `StockRow`: the `(link, stock)` projection of a stored row
//! - `NodeKind`: per-node state of the category walker

mod record;
mod stock;

// Re-export main types
pub use record::{CategoryNode, NodeKind, ResultList, StockRow, TOP_PARENT};
pub use stock::Stock;
