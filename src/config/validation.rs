use crate::config::types::{
    Config, CrawlConfig, FetchConfig, OutputConfig, ReconcileConfig, SelectorConfig, SiteConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

const MAX_CONCURRENCY: usize = 32;
const MAX_RETRIES: u32 = 20;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetch_config(&config.fetch)?;
    validate_crawl_config(&config.crawl)?;
    validate_reconcile_config(&config.reconcile)?;
    validate_output_config(&config.output)?;
    validate_selector_config(&config.selectors)?;
    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.root_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.root_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "root_url must be http or https, got {}",
            url.scheme()
        )));
    }

    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.retries < 1 || config.retries > MAX_RETRIES {
        return Err(ConfigError::Validation(format!(
            "retries must be between 1 and {}, got {}",
            MAX_RETRIES, config.retries
        )));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_concurrency("crawl.concurrency", config.concurrency)
}

fn validate_reconcile_config(config: &ReconcileConfig) -> Result<(), ConfigError> {
    validate_concurrency("reconcile.concurrency", config.concurrency)
}

fn validate_concurrency(name: &str, value: usize) -> Result<(), ConfigError> {
    if value < 1 || value > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_CONCURRENCY, value
        )));
    }
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.table_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "table_path cannot be empty".to_string(),
        ));
    }

    if config.failure_log_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "failure_log_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (name, selector) in [
        ("category-menu", &config.category_menu),
        ("show-all-form", &config.show_all_form),
        ("product-item", &config.product_item),
        ("available-count", &config.available_count),
        ("product-container", &config.product_container),
        ("product-link", &config.product_link),
        ("product-name", &config.product_name),
        ("buy-button", &config.buy_button),
        ("stock-quantity", &config.stock_quantity),
    ] {
        if Selector::parse(selector).is_err() {
            return Err(ConfigError::InvalidSelector {
                name,
                selector: selector.clone(),
            });
        }
    }

    for (name, field) in [
        ("category-id-field", &config.category_id_field),
        ("page-size-field", &config.page_size_field),
    ] {
        if field.is_empty() || field.contains(['"', '\\']) {
            return Err(ConfigError::Validation(format!(
                "{} must be a plain form field name, got {:?}",
                name, field
            )));
        }
    }

    Ok(())
}
