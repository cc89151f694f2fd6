//! Storage module for persisting catalogue tables
//!
//! This module handles all file persistence for the tool, including:
//! - Writing the crawl output table in one shot
//! - Reading `(link, stock)` projections for a row range
//! - Copy-on-write stock updates addressed by absolute row
//! - The append-only log of URLs that exhausted their retries

mod csv_store;
mod failure_log;
mod traits;

pub use csv_store::CsvStore;
pub use failure_log::FailureLog;
pub use traits::{RowRange, Store, StoreError, StoreResult};
