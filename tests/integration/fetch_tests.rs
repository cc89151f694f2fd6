//! Retry, backoff and failure-log behaviour of the fetcher

use std::time::{Duration, Instant};
use stock_scout::config::FetchConfig;
use stock_scout::crawler::{build_http_client, Fetcher, RetryPolicy};
use stock_scout::storage::FailureLog;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(policy: RetryPolicy, dir: &TempDir) -> Fetcher {
    let config = FetchConfig {
        timeout_secs: 5,
        ..Default::default()
    };
    Fetcher::new(
        build_http_client(&config).unwrap(),
        policy,
        FailureLog::new(dir.path().join("failed_urls.txt")),
    )
}

#[tokio::test]
async fn test_retries_with_backoff_then_succeeds() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>ok</body></html>"))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(RetryPolicy::new(5, Duration::from_millis(50)), &dir);
    let url = Url::parse(&format!("{}/flaky", mock_server.uri())).unwrap();

    let started = Instant::now();
    let page = fetcher.fetch(&url).await;
    let elapsed = started.elapsed();

    assert!(page.is_some());
    // Waits of 50ms then 100ms precede the third attempt
    assert!(elapsed >= Duration::from_millis(150), "elapsed {:?}", elapsed);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);

    let counts = fetcher.counts();
    assert_eq!(counts.requests, 3);
    assert_eq!(counts.retries, 2);
    assert_eq!(counts.exhausted, 0);
    assert!(fetcher.failure_log().entries().unwrap().is_empty());
}

#[tokio::test]
async fn test_exhausted_url_is_logged_once() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(RetryPolicy::new(3, Duration::from_millis(5)), &dir);
    let url = Url::parse(&format!("{}/down", mock_server.uri())).unwrap();

    assert!(fetcher.fetch(&url).await.is_none());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(
        fetcher.failure_log().entries().unwrap(),
        vec![url.to_string()]
    );
    assert_eq!(fetcher.counts().exhausted, 1);
}

#[tokio::test]
async fn test_single_attempt_does_not_wait() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(RetryPolicy::new(1, Duration::from_secs(30)), &dir);
    let url = Url::parse(&format!("{}/missing", mock_server.uri())).unwrap();

    let started = Instant::now();
    assert!(fetcher.fetch(&url).await.is_none());
    assert!(started.elapsed() < Duration::from_secs(30));
    assert_eq!(fetcher.counts().retries, 0);
}
