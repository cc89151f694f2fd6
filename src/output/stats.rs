//! Run reports for crawls and stock refreshes
//!
//! Reports are assembled at the end of a run and printed to stdout.

use crate::crawler::FetchCounts;
use chrono::{DateTime, Utc};

/// Outcome of a full crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Category rows written
    pub categories: usize,

    /// Product rows written
    pub products: usize,

    pub fetches: FetchCounts,
}

impl CrawlReport {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Total rows written to the table
    pub fn rows(&self) -> usize {
        self.categories + self.products
    }
}

/// Outcome of a stock refresh pass
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// First row of the refreshed range
    pub start_row: usize,

    /// One past the last row of the refreshed range
    pub end_row: usize,

    /// Rows that had a product link
    pub products: usize,

    /// Rows whose live quantity was read
    pub refreshed: usize,

    /// Rows written back to the table
    pub written: usize,

    pub fetches: FetchCounts,
}

impl ReconcileReport {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Percentage of product rows whose quantity was read
    pub fn refresh_rate(&self) -> f64 {
        if self.products == 0 {
            return 0.0;
        }
        (self.refreshed as f64 / self.products as f64) * 100.0
    }
}

fn print_fetches(fetches: &FetchCounts) {
    println!("Fetches:");
    println!("  Requests sent: {}", fetches.requests);
    println!("  Retries: {}", fetches.retries);
    println!("  Unreachable URLs: {}", fetches.exhausted);
}

/// Prints a crawl report to stdout
pub fn print_crawl_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Run:");
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Duration: {}s", report.duration_seconds());
    println!();

    println!("Rows written: {}", report.rows());
    println!("  Categories: {}", report.categories);
    println!("  Products: {}", report.products);
    println!();

    print_fetches(&report.fetches);
}

/// Prints a stock refresh report to stdout
pub fn print_reconcile_report(report: &ReconcileReport) {
    println!("=== Stock Refresh Report ===\n");

    println!("Run:");
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Duration: {}s", report.duration_seconds());
    println!("  Rows: {}..{}", report.start_row, report.end_row);
    println!();

    println!(
        "Refreshed: {:.1}% ({} / {} product rows)",
        report.refresh_rate(),
        report.refreshed,
        report.products
    );
    println!("Rows written back: {}", report.written);
    println!();

    print_fetches(&report.fetches);
}
