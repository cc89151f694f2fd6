//! Product resolver: turns one leaf category page into product rows
//!
//! A leaf listing comes in two shapes. Without a "show all" gate the page
//! already lists everything and each item carrying a buy button is in
//! stock. With a gate, the full listing is fetched from a parameterised
//! URL and only the first `available_count` items are trusted as in stock;
//! the storefront renders available products before unavailable ones.

use crate::crawler::fetcher::{Document, Fetcher};
use crate::crawler::selectors::{GateLookup, ProductMeta, Selectors, ShowAllGate};
use crate::state::{CategoryNode, ResultList};
use crate::url::with_query_pairs;
use url::Url;

/// Resolves leaf category pages into product records
pub struct ProductResolver<'a> {
    fetcher: &'a Fetcher,
    selectors: &'a Selectors,
}

impl<'a> ProductResolver<'a> {
    pub fn new(fetcher: &'a Fetcher, selectors: &'a Selectors) -> Self {
        Self { fetcher, selectors }
    }

    /// Appends one record per available product listed under `link`
    ///
    /// Any fetch failure or missing page structure ends the branch quietly;
    /// nothing is appended for it.
    pub async fn resolve(&self, link: &Url, category: &str, out: &mut ResultList) {
        let Some(page) = self.fetcher.fetch(link).await else {
            return;
        };

        let products = match self.selectors.show_all_gate(&page) {
            GateLookup::Absent => ungated_products(self.selectors, &page),
            GateLookup::Incomplete => {
                tracing::debug!("Show-all gate on {} is missing its fields, skipping", link);
                return;
            }
            GateLookup::Present(gate) => {
                drop(page);
                let full_url = self.show_all_url(link, &gate);
                let Some(full) = self.fetcher.fetch(&full_url).await else {
                    return;
                };
                match gated_products(self.selectors, &full) {
                    Some(products) => products,
                    None => {
                        tracing::debug!("No availability counter on {}, skipping", full_url);
                        return;
                    }
                }
            }
        };

        tracing::info!("{} products available in {}", products.len(), category);
        for product in products {
            tracing::debug!("Found product {} at {}", product.name, product.link);
            out.push(CategoryNode::product(category, product.name, product.link));
        }
    }

    /// Full-listing URL behind a gate
    pub fn show_all_url(&self, link: &Url, gate: &ShowAllGate) -> Url {
        let (id_field, size_field) = self.selectors.gate_fields();
        with_query_pairs(
            link,
            &[
                (id_field, gate.category_id.as_str()),
                (size_field, gate.page_size.as_str()),
            ],
        )
    }
}

/// Products of a listing without a gate: every item with a buy button
pub fn ungated_products(selectors: &Selectors, page: &Document) -> Vec<ProductMeta> {
    selectors
        .product_items(page)
        .into_iter()
        .filter(|item| selectors.is_purchasable(*item))
        .filter_map(|item| selectors.product_meta(item, page.url()))
        .collect()
}

/// Products of a full (gated) listing, bounded by the availability counter
///
/// Returns None when the page has no counter. Only the first
/// `available_count` rendered items are considered; the rest are out of
/// stock.
pub fn gated_products(selectors: &Selectors, page: &Document) -> Option<Vec<ProductMeta>> {
    let available = selectors.available_count(page)?;
    let items = selectors.product_items(page);

    if available > items.len() {
        tracing::warn!(
            "{} reports {} available products but lists only {}",
            page.url(),
            available,
            items.len()
        );
    }

    Some(
        items
            .into_iter()
            .take(available)
            .filter(|item| selectors.has_product_container(*item))
            .filter_map(|item| selectors.product_meta(item, page.url()))
            .collect(),
    )
}
