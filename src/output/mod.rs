//! Output module for run reports
//!
//! This module handles:
//! - Assembling crawl and stock refresh reports
//! - Printing them at the end of a run

pub mod stats;

pub use stats::{print_crawl_report, print_reconcile_report, CrawlReport, ReconcileReport};
