//! Shared fixtures: test configuration and storefront markup

use std::path::Path;
use stock_scout::config::{Config, CrawlConfig, FetchConfig, OutputConfig, SiteConfig};

/// Creates a test configuration pointing at `base_url` with files in `dir`
pub fn test_config(base_url: &str, dir: &Path) -> Config {
    Config {
        site: SiteConfig {
            root_url: format!("{}/", base_url),
        },
        fetch: FetchConfig {
            user_agent: "StockScoutTest/1.0".to_string(),
            retries: 2,
            backoff_base_ms: 10, // Very short for testing
            timeout_secs: 5,
        },
        crawl: CrawlConfig {
            concurrency: 1,
            category_delay_ms: 0,
        },
        output: OutputConfig {
            table_path: dir.join("products.csv").to_string_lossy().into_owned(),
            failure_log_path: dir.join("failed_urls.txt").to_string_lossy().into_owned(),
        },
        ..Default::default()
    }
}

/// Root page with the given category menu items
pub fn root_page(items: &str) -> String {
    format!(
        r#"<html><head><title>Shop</title></head><body>
        <div class="block_content"><ul>{}</ul></div>
        </body></html>"#,
        items
    )
}

/// One rendered product list item
pub fn product_item(name: &str, href: &str, purchasable: bool) -> String {
    let button = if purchasable {
        r#"<div class="button-container-sabad"><a>Add to cart</a></div>"#
    } else {
        ""
    };
    format!(
        r#"<li><div class="product-container">
            <meta content="{}">
            <div><link href="{}"></div>
            {}
        </div></li>"#,
        name, href, button
    )
}

/// Listing page without a "show all" gate
pub fn listing_page(items: &[String]) -> String {
    format!(
        r#"<html><body><ul id="product_list_cat">{}</ul></body></html>"#,
        items.concat()
    )
}

/// First page of a gated listing
pub fn gate_page(category_id: &str, page_size: &str) -> String {
    format!(
        r#"<html><body>
        <form class="showall" method="get">
            <input type="hidden" name="id_category" value="{}">
            <input type="hidden" name="n" value="{}">
            <button type="submit">Show all</button>
        </form>
        <ul id="product_list_cat"></ul>
        </body></html>"#,
        category_id, page_size
    )
}

/// Full listing behind a gate, with its availability counter
pub fn full_listing_page(available: usize, items: &[String]) -> String {
    format!(
        r#"<html><body>
        <div class="PM_ASCriterionNbProduct">({})</div>
        <ul id="product_list_cat">{}</ul>
        </body></html>"#,
        available,
        items.concat()
    )
}

/// Product page showing a stock quantity
pub fn product_page(quantity: &str) -> String {
    format!(
        r#"<html><body><span id="quantityAvailable">{}</span></body></html>"#,
        quantity
    )
}
