//! Integration tests for Stock-Scout
//!
//! These tests use wiremock to stand in for the storefront and tempfile
//! for the table and failure log.

mod fetch_tests;
mod reconcile_tests;
mod support;
