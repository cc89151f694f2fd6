//! Stock refresh tests against a mock storefront and a temp table

use crate::support::{product_page, test_config};
use stock_scout::crawler::{build_http_client, Fetcher, RetryPolicy, Selectors};
use stock_scout::reconcile::{run_refresh, StockReconciler, WritePolicy};
use stock_scout::state::{CategoryNode, Stock, StockRow};
use stock_scout::storage::{CsvStore, FailureLog, RowRange, Store, StoreError};
use stock_scout::{Config, ScoutError};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_product(server: &MockServer, at: &str, quantity: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page(quantity)))
        .mount(server)
        .await;
}

fn product(name: &str, link: String, stock: Stock) -> CategoryNode {
    CategoryNode {
        parent_category: "Shoes".to_string(),
        name: name.to_string(),
        link: Some(link),
        stock,
    }
}

/// Writes `[Shoes, p1 (-1), p2 (5)]` and returns the store
fn seed_table(config: &Config, base_url: &str) -> CsvStore {
    let mut store = CsvStore::new(&config.output.table_path);
    store
        .write_records(&[
            CategoryNode::category("none_parent", "Shoes"),
            product("Runner", format!("{}/p/1", base_url), Stock::Unresolved),
            product("Trail", format!("{}/p/2", base_url), Stock::Known(5)),
        ])
        .unwrap();
    store
}

fn stocks(store: &CsvStore) -> Vec<Stock> {
    store
        .read_stock_rows(RowRange::all())
        .unwrap()
        .into_iter()
        .map(|row: StockRow| row.stock)
        .collect()
}

#[tokio::test]
async fn test_resolved_quantities_are_not_persisted_by_default() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_product(&mock_server, "/p/1", "7").await;
    mount_product(&mock_server, "/p/2", "9").await;

    let config = test_config(&base_url, dir.path());
    let store = seed_table(&config, &base_url);

    let report = run_refresh(&config, RowRange::all(), WritePolicy::PendingOnly)
        .await
        .unwrap();

    assert_eq!(report.products, 2);
    assert_eq!(report.refreshed, 2);
    assert_eq!(report.written, 0);
    assert_eq!(
        stocks(&store),
        vec![Stock::NotApplicable, Stock::Unresolved, Stock::Known(5)]
    );
}

#[tokio::test]
async fn test_include_resolved_writes_new_quantities() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_product(&mock_server, "/p/1", "7").await;
    mount_product(&mock_server, "/p/2", "۹").await;

    let config = test_config(&base_url, dir.path());
    let store = seed_table(&config, &base_url);

    let report = run_refresh(&config, RowRange::all(), WritePolicy::IncludeResolved)
        .await
        .unwrap();

    assert_eq!(report.written, 2);
    assert_eq!(
        stocks(&store),
        vec![Stock::NotApplicable, Stock::Known(7), Stock::Known(9)]
    );
}

#[tokio::test]
async fn test_unreadable_product_stays_unresolved() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/p/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_product(&mock_server, "/p/2", "9").await;

    let config = test_config(&base_url, dir.path());
    let store = seed_table(&config, &base_url);

    let report = run_refresh(&config, RowRange::all(), WritePolicy::PendingOnly)
        .await
        .unwrap();

    assert_eq!(report.refreshed, 1);
    assert_eq!(report.written, 1);
    assert_eq!(
        stocks(&store),
        vec![Stock::NotApplicable, Stock::Unresolved, Stock::Known(5)]
    );

    let failures = FailureLog::new(&config.output.failure_log_path)
        .entries()
        .unwrap();
    assert_eq!(failures, vec![format!("{}/p/1", base_url)]);

    let table = std::fs::read_to_string(&config.output.table_path).unwrap();
    assert!(table.contains(&format!("Shoes,Runner,{}/p/1,-1", base_url)));
}

#[tokio::test]
async fn test_refresh_only_visits_rows_in_range() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_product(&mock_server, "/p/1", "7").await;
    mount_product(&mock_server, "/p/2", "9").await;

    let config = test_config(&base_url, dir.path());
    let mut store = seed_table(&config, &base_url);

    let failure_log = FailureLog::new(&config.output.failure_log_path);
    let fetcher = Fetcher::new(
        build_http_client(&config.fetch).unwrap(),
        RetryPolicy::from_config(&config.fetch),
        failure_log,
    );
    let selectors = Selectors::from_config(&config.selectors).unwrap();

    let report = StockReconciler::new(&fetcher, &selectors)
        .with_policy(WritePolicy::IncludeResolved)
        .refresh(&mut store, RowRange::new(1, Some(2)))
        .await
        .unwrap();

    assert_eq!((report.start_row, report.end_row), (1, 2));
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/p/1");
    assert_eq!(
        stocks(&store),
        vec![Stock::NotApplicable, Stock::Known(7), Stock::Known(5)]
    );
}

#[tokio::test]
async fn test_concurrent_refresh_keeps_row_alignment() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    // Earlier rows answer last
    for (route, quantity, delay_ms) in [("/p/1", "7", 300), ("/p/2", "8", 150), ("/p/3", "9", 0)] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(product_page(quantity))
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(&mock_server)
            .await;
    }

    let config = test_config(&base_url, dir.path());
    let mut store = CsvStore::new(&config.output.table_path);
    store
        .write_records(&[
            CategoryNode::category("none_parent", "Shoes"),
            product("Runner", format!("{}/p/1", base_url), Stock::Unresolved),
            product("Trail", format!("{}/p/2", base_url), Stock::Unresolved),
            product("Court", format!("{}/p/3", base_url), Stock::Unresolved),
        ])
        .unwrap();

    let fetcher = Fetcher::new(
        build_http_client(&config.fetch).unwrap(),
        RetryPolicy::from_config(&config.fetch),
        FailureLog::new(&config.output.failure_log_path),
    );
    let selectors = Selectors::from_config(&config.selectors).unwrap();
    let reconciler = StockReconciler::new(&fetcher, &selectors)
        .with_concurrency(4)
        .with_policy(WritePolicy::IncludeResolved);

    let rows = store.read_stock_rows(RowRange::all()).unwrap();
    assert_eq!(
        reconciler.live_quantities(&rows).await,
        vec![None, Some(7), Some(8), Some(9)]
    );

    let report = reconciler.refresh(&mut store, RowRange::all()).await.unwrap();
    assert_eq!(report.written, 3);
    assert_eq!(
        stocks(&store),
        vec![
            Stock::NotApplicable,
            Stock::Known(7),
            Stock::Known(8),
            Stock::Known(9)
        ]
    );
}

#[tokio::test]
async fn test_out_of_bounds_range_fails_before_fetching() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_product(&mock_server, "/p/1", "7").await;

    let config = test_config(&base_url, dir.path());
    let store = seed_table(&config, &base_url);
    let before = std::fs::read_to_string(store.path()).unwrap();

    let result = run_refresh(
        &config,
        RowRange::new(1, Some(10)),
        WritePolicy::IncludeResolved,
    )
    .await;

    assert!(matches!(
        result,
        Err(ScoutError::Store(StoreError::RangeOutOfBounds { rows: 3, .. }))
    ));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
}

#[tokio::test]
async fn test_missing_table() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let config = test_config(&mock_server.uri(), dir.path());
    let result = run_refresh(&config, RowRange::all(), WritePolicy::PendingOnly).await;

    assert!(matches!(
        result,
        Err(ScoutError::Store(StoreError::MissingTable(_)))
    ));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
