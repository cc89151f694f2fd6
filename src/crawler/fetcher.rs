//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the tool, including:
//! - Building HTTP clients with a browser-like user agent
//! - GET requests returning parsed documents
//! - Retry with exponential backoff for any failed attempt
//! - Logging URLs that exhaust their retries

use crate::config::FetchConfig;
use crate::crawler::retry::RetryPolicy;
use crate::storage::FailureLog;
use reqwest::Client;
use scraper::Html;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A fetched and parsed HTML page
pub struct Document {
    url: Url,
    html: Html,
}

impl Document {
    /// Parses `body` as the page found at `url`
    pub fn parse(url: Url, body: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(body),
        }
    }

    /// Final URL of the page, used to resolve relative links
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").field("url", &self.url.as_str()).finish()
    }
}

/// Why a single fetch attempt failed
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("request timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for AttemptError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else if e.is_body() || e.is_decode() {
            Self::Body(e.to_string())
        } else {
            Self::Other(e.to_string())
        }
    }
}

/// Counters for the fetches issued during a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchCounts {
    /// HTTP requests sent, retries included
    pub requests: u64,

    /// Attempts that were followed by a backoff wait
    pub retries: u64,

    /// URLs that exhausted every attempt
    pub exhausted: u64,
}

impl FetchCounts {
    /// Counts accumulated after `earlier` was taken
    pub fn since(&self, earlier: &FetchCounts) -> FetchCounts {
        FetchCounts {
            requests: self.requests.saturating_sub(earlier.requests),
            retries: self.retries.saturating_sub(earlier.retries),
            exhausted: self.exhausted.saturating_sub(earlier.exhausted),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use stock_scout::config::FetchConfig;
/// use stock_scout::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(30)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages with retry, backoff and failure logging
///
/// A fetch either yields a parsed `Document` or, once every attempt has
/// failed, records the URL in the failure log and yields `None`. Callers
/// treat `None` as "skip this branch".
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    failure_log: FailureLog,
    requests: AtomicU64,
    retries: AtomicU64,
    exhausted: AtomicU64,
}

impl Fetcher {
    pub fn new(client: Client, policy: RetryPolicy, failure_log: FailureLog) -> Self {
        Self {
            client,
            policy,
            failure_log,
            requests: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            exhausted: AtomicU64::new(0),
        }
    }

    /// Builds a fetcher from the fetch settings and failure log path
    pub fn from_config(
        config: &FetchConfig,
        failure_log: FailureLog,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::new(client, RetryPolicy::from_config(config), failure_log))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn failure_log(&self) -> &FailureLog {
        &self.failure_log
    }

    /// Snapshot of the counters so far
    pub fn counts(&self) -> FetchCounts {
        FetchCounts {
            requests: self.requests.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
        }
    }

    /// Fetches and parses a page
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Parse body, return document |
    /// | Non-2xx, timeout, connection or body error | Wait `base * 2^attempt`, retry |
    /// | Last attempt failed | Log URL to failure log, return None |
    pub async fn fetch(&self, url: &Url) -> Option<Document> {
        let mut attempt = 0;
        loop {
            match self.attempt(url).await {
                Ok(document) => return Some(document),
                Err(e) => match self.policy.delay_after(attempt) {
                    Some(wait) => {
                        self.retries.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(
                            "Attempt {} for {} failed ({}). Retrying in {:?}",
                            attempt + 1,
                            url,
                            e,
                            wait
                        );
                        tokio::time::sleep(wait).await;
                        attempt += 1;
                    }
                    None => {
                        self.give_up(url, &e);
                        return None;
                    }
                },
            }
        }
    }

    /// Performs one GET and parses a successful body
    async fn attempt(&self, url: &Url) -> Result<Document, AttemptError> {
        self.requests.fetch_add(1, Ordering::Relaxed);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;

        let final_url = response.url().clone();
        let body = response.text().await?;
        Ok(Document::parse(final_url, &body))
    }

    fn give_up(&self, url: &Url, last_error: &AttemptError) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            "Failed to fetch {} after {} attempts: {}",
            url,
            self.policy.max_attempts(),
            last_error
        );

        if let Err(e) = self.failure_log.record(url.as_str()) {
            tracing::error!(
                "Could not append {} to {}: {}",
                url,
                self.failure_log.path().display(),
                e
            );
        }
    }
}
