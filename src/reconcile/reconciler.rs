use crate::config::Config;
use crate::crawler::{parse_quantity, Fetcher, Selectors};
use crate::output::ReconcileReport;
use crate::state::{Stock, StockRow};
use crate::storage::{CsvStore, FailureLog, RowRange, Store, StoreError};
use crate::ScoutError;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use url::Url;

/// Which rows a refresh pass writes back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Only rows still unresolved after the pass
    #[default]
    PendingOnly,

    /// Still-unresolved rows plus rows resolved during the pass
    IncludeResolved,
}

impl WritePolicy {
    pub fn from_flag(write_resolved: bool) -> Self {
        if write_resolved {
            Self::IncludeResolved
        } else {
            Self::PendingOnly
        }
    }
}

/// Re-reads live stock for stored product rows
pub struct StockReconciler<'a> {
    fetcher: &'a Fetcher,
    selectors: &'a Selectors,
    concurrency: usize,
    policy: WritePolicy,
}

impl<'a> StockReconciler<'a> {
    pub fn new(fetcher: &'a Fetcher, selectors: &'a Selectors) -> Self {
        Self {
            fetcher,
            selectors,
            concurrency: 1,
            policy: WritePolicy::default(),
        }
    }

    /// Product pages fetched at the same time (results keep row order)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_policy(mut self, policy: WritePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Refreshes rows `range` of `store` and writes back per the policy
    ///
    /// Rows are matched to the table by position: store row `i` is list
    /// entry `i - start`. The pass fails before any fetch if the range does
    /// not fit the table.
    pub async fn refresh<S: Store>(
        &self,
        store: &mut S,
        range: RowRange,
    ) -> Result<ReconcileReport, ScoutError> {
        let started_at = Utc::now();
        let baseline = self.fetcher.counts();

        let (start, end) = range.resolve(store.row_count()?)?;
        let rows = store.read_stock_rows(RowRange::new(start, Some(end)))?;
        if rows.len() != end - start {
            return Err(StoreError::LengthMismatch {
                expected: end - start,
                actual: rows.len(),
            }
            .into());
        }

        tracing::info!("Refreshing stock for rows {}..{}", start, end);
        let quantities = self.live_quantities(&rows).await;
        let refreshed = apply_quantities(&rows, &quantities);

        let updates = pending_updates(&rows, &refreshed, self.policy);
        store.write_stock(&updates)?;

        let report = ReconcileReport {
            started_at,
            finished_at: Utc::now(),
            start_row: start,
            end_row: end,
            products: rows.iter().filter(|r| r.link.is_some()).count(),
            refreshed: quantities.iter().flatten().count(),
            written: updates.len(),
            fetches: self.fetcher.counts().since(&baseline),
        };
        tracing::info!(
            "Stock refresh completed: {} of {} product rows refreshed, {} rows written",
            report.refreshed,
            report.products,
            report.written
        );
        Ok(report)
    }

    /// Reads the live quantity of every row, in row order
    ///
    /// Rows without a link, and rows whose page or quantity cannot be read,
    /// yield None. With a concurrency above one, fetches overlap but results
    /// still line up with their rows by position.
    pub async fn live_quantities(&self, rows: &[StockRow]) -> Vec<Option<u32>> {
        stream::iter(rows)
            .map(|row| self.live_quantity(row))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Reads the live quantity of a row's product page
    async fn live_quantity(&self, row: &StockRow) -> Option<u32> {
        let link = row.link.as_deref()?;
        let url = match Url::parse(link) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Row {} has an invalid link {:?}: {}", row.row, link, e);
                return None;
            }
        };

        let page = self.fetcher.fetch(&url).await?;
        let text = self.selectors.stock_quantity(&page)?;
        match parse_quantity(&text) {
            Some(quantity) => {
                tracing::info!("Product at {} updated, quantity is {}", url, quantity);
                Some(quantity)
            }
            None => {
                tracing::warn!("Unreadable quantity {:?} on {}", text, url);
                None
            }
        }
    }
}

/// Returns a copy of `rows` with every read quantity filled in
pub fn apply_quantities(rows: &[StockRow], quantities: &[Option<u32>]) -> Vec<StockRow> {
    rows.iter()
        .zip(quantities)
        .map(|(row, quantity)| {
            let mut row = row.clone();
            if let Some(quantity) = quantity {
                row.stock = Stock::Known(*quantity);
            }
            row
        })
        .collect()
}

/// Rows to write back after a refresh pass
///
/// `before` and `after` are the rows as read and as refreshed, in the same
/// order. Rows still unresolved are always written (with the unresolved
/// marker); rows whose quantity was resolved in this pass are written only
/// under `WritePolicy::IncludeResolved`.
pub fn pending_updates(
    before: &[StockRow],
    after: &[StockRow],
    policy: WritePolicy,
) -> Vec<StockRow> {
    before
        .iter()
        .zip(after)
        .filter(|(old, new)| match policy {
            WritePolicy::PendingOnly => new.stock.is_unresolved(),
            WritePolicy::IncludeResolved => {
                new.stock.is_unresolved() || (new.stock.is_known() && old.stock != new.stock)
            }
        })
        .map(|(_, new)| new.clone())
        .collect()
}

/// Runs a stock refresh against the configured table
pub async fn run_refresh(
    config: &Config,
    range: RowRange,
    policy: WritePolicy,
) -> Result<ReconcileReport, ScoutError> {
    let mut store = CsvStore::new(&config.output.table_path);
    if !store.exists() {
        return Err(StoreError::MissingTable(store.path().to_path_buf()).into());
    }

    let failure_log = FailureLog::new(&config.output.failure_log_path);
    let fetcher = Fetcher::from_config(&config.fetch, failure_log)?;
    let selectors = Selectors::from_config(&config.selectors)?;

    StockReconciler::new(&fetcher, &selectors)
        .with_concurrency(config.reconcile.concurrency)
        .with_policy(policy)
        .refresh(&mut store, range)
        .await
}
