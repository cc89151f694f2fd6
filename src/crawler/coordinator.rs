//! Crawl coordinator - top-level crawl orchestration
//!
//! This module contains the crawl entry point, which:
//! - Fetches the site root and copies its category menu
//! - Walks every top-level category, optionally several at once
//! - Merges per-category buffers in menu order
//! - Writes the result table exactly once

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::selectors::Selectors;
use crate::crawler::walker::CategoryWalker;
use crate::output::CrawlReport;
use crate::state::ResultList;
use crate::storage::{CsvStore, FailureLog, Store};
use crate::ScoutError;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

/// Main crawl coordinator structure
pub struct Coordinator<S: Store = CsvStore> {
    config: Config,
    fetcher: Fetcher,
    selectors: Selectors,
    store: S,
}

impl Coordinator<CsvStore> {
    /// Creates a coordinator writing to the configured table path
    pub fn new(config: Config) -> Result<Self, ScoutError> {
        let store = CsvStore::new(&config.output.table_path);
        Self::with_store(config, store)
    }
}

impl<S: Store> Coordinator<S> {
    /// Creates a coordinator writing to the given store
    pub fn with_store(config: Config, store: S) -> Result<Self, ScoutError> {
        let failure_log = FailureLog::new(&config.output.failure_log_path);
        let fetcher = Fetcher::from_config(&config.fetch, failure_log)?;
        let selectors = Selectors::from_config(&config.selectors)?;

        Ok(Self {
            config,
            fetcher,
            selectors,
            store,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Discovers every category and available product
    ///
    /// Only a missing root page or category menu fails the crawl; every
    /// other failure skips its branch.
    pub async fn crawl(&self) -> Result<ResultList, ScoutError> {
        let root = Url::parse(&self.config.site.root_url)?;
        tracing::info!("Fetching category menu from {}", root);

        let tree = {
            let page = self
                .fetcher
                .fetch(&root)
                .await
                .ok_or_else(|| ScoutError::RootUnavailable {
                    url: root.to_string(),
                })?;
            self.selectors
                .menu_tree(&page)
                .ok_or_else(|| ScoutError::MenuMissing {
                    url: root.to_string(),
                })?
        };

        let total = tree.len();
        tracing::info!("Found {} top-level categories", total);

        let walker = CategoryWalker::new(&self.fetcher, &self.selectors);
        let delay = Duration::from_millis(self.config.crawl.category_delay_ms);
        // Category starts take turns, so each one is `delay` after the last
        let start_gate = Mutex::new(());

        let branches: Vec<ResultList> = stream::iter(tree.iter().enumerate())
            .map(|(index, node)| {
                let walker = &walker;
                let start_gate = &start_gate;
                async move {
                    if index > 0 && !delay.is_zero() {
                        let _turn = start_gate.lock().await;
                        tokio::time::sleep(delay).await;
                    }
                    tracing::info!(
                        "Walking category {}/{}: {}",
                        index + 1,
                        total,
                        node.name
                    );
                    let mut branch = ResultList::new();
                    walker.walk_top(node, &mut branch).await;
                    branch
                }
            })
            .buffered(self.config.crawl.concurrency.max(1))
            .collect()
            .await;

        let mut records = ResultList::new();
        for branch in branches {
            records.append(branch);
        }
        Ok(records)
    }

    /// Crawls the site and replaces the table with the result
    pub async fn run(&mut self) -> Result<CrawlReport, ScoutError> {
        let started_at = Utc::now();
        let records = self.crawl().await?;

        self.store.write_records(records.as_slice())?;

        let report = CrawlReport {
            started_at,
            finished_at: Utc::now(),
            categories: records.category_count(),
            products: records.product_count(),
            fetches: self.fetcher.counts(),
        };
        tracing::info!(
            "Crawl completed: {} categories, {} products",
            report.categories,
            report.products
        );
        Ok(report)
    }
}

/// Runs a complete crawl against the configured table
pub async fn run_crawl(config: Config) -> Result<CrawlReport, ScoutError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
