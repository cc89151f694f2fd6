//! Crawler module for catalogue discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry and exponential backoff
//! - Storefront selectors over parsed pages
//! - Category menu traversal
//! - Product resolution on leaf listings
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod resolver;
mod retry;
mod selectors;
mod walker;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, AttemptError, Document, FetchCounts, Fetcher};
pub use resolver::{gated_products, ungated_products, ProductResolver};
pub use retry::RetryPolicy;
pub use selectors::{parse_quantity, GateLookup, MenuNode, ProductMeta, Selectors, ShowAllGate};
pub use walker::CategoryWalker;

use crate::config::Config;
use crate::output::CrawlReport;
use crate::ScoutError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and selectors
/// 2. Fetch the site root and copy its category menu
/// 3. Walk every category and resolve product listings
/// 4. Write the result table
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed and the table was written
/// * `Err(ScoutError)` - Root page unusable or table could not be written
pub async fn crawl(config: Config) -> Result<CrawlReport, ScoutError> {
    run_crawl(config).await
}
