use serde::Deserialize;

/// Main configuration structure for Stock-Scout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub fetch: FetchConfig,
    pub crawl: CrawlConfig,
    pub reconcile: ReconcileConfig,
    pub output: OutputConfig,
    pub selectors: SelectorConfig,
}

/// Target storefront
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Page holding the top-level category menu
    pub root_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_url: "https://ickala.com/".to_string(),
        }
    }
}

/// HTTP fetch and retry behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Total attempts per URL before it is logged as failed
    pub retries: u32,

    /// Base of the exponential backoff (milliseconds)
    pub backoff_base_ms: u64,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3"
                .to_string(),
            retries: 8,
            backoff_base_ms: 2000,
            timeout_secs: 600,
        }
    }
}

/// Category walk behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Top-level categories walked at the same time
    pub concurrency: usize,

    /// Pause before each top-level category after the first (milliseconds)
    ///
    /// With concurrency above one, category starts are still spaced by
    /// this pause.
    pub category_delay_ms: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            category_delay_ms: 1000,
        }
    }
}

/// Stock refresh behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReconcileConfig {
    /// Product pages fetched at the same time
    pub concurrency: usize,

    /// Also write quantities that were resolved during the pass
    pub write_resolved: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            write_resolved: false,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the catalogue table (CSV)
    pub table_path: String,

    /// Path to the log of URLs that exhausted their retries
    pub failure_log_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            table_path: "products.csv".to_string(),
            failure_log_path: "failed_urls.txt".to_string(),
        }
    }
}

/// CSS selectors describing the storefront's markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// Top-level category list on the root page
    pub category_menu: String,

    /// Form that gates the full product listing
    pub show_all_form: String,

    /// `name` of the gate field carrying the category id
    pub category_id_field: String,

    /// `name` of the gate field carrying the page size
    pub page_size_field: String,

    /// Product list items on a category page
    pub product_item: String,

    /// Counter of purchasable products on a gated listing
    pub available_count: String,

    /// Container present on every real product item
    pub product_container: String,

    /// Element whose `href` is the product page URL
    pub product_link: String,

    /// Element whose `content` is the product name
    pub product_name: String,

    /// Buy button marking a purchasable item on an ungated listing
    pub buy_button: String,

    /// Quantity element on a product page
    pub stock_quantity: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            category_menu: "div.block_content ul".to_string(),
            show_all_form: "form.showall".to_string(),
            category_id_field: "id_category".to_string(),
            page_size_field: "n".to_string(),
            product_item: "ul#product_list_cat li".to_string(),
            available_count: "div.PM_ASCriterionNbProduct".to_string(),
            product_container: "div.product-container".to_string(),
            product_link: "div.product-container div link".to_string(),
            product_name: "meta".to_string(),
            buy_button: "div.product-container div.button-container-sabad".to_string(),
            stock_quantity: "span#quantityAvailable".to_string(),
        }
    }
}
