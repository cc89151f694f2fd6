//! Selector layer: typed fragments extracted from storefront pages
//!
//! Everything here is a pure function over a parsed `Document`; no I/O
//! happens in this module. The concrete CSS selectors come from the
//! `[selectors]` config section.

use crate::config::SelectorConfig;
use crate::crawler::fetcher::Document;
use crate::state::NodeKind;
use crate::url::resolve_link;
use crate::ConfigError;
use scraper::{ElementRef, Selector};
use url::Url;

/// Owned snapshot of one category menu item
///
/// The menu is copied out of the root document before any product page is
/// fetched, so no parsed HTML has to live across network waits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNode {
    /// Trimmed text of the item's link
    pub name: String,

    /// Absolute target of the item's link
    pub link: Option<Url>,

    /// Direct sub-categories, in document order
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// Which walker state this item falls into
    pub fn kind(&self) -> NodeKind {
        if !self.children.is_empty() {
            NodeKind::NonLeaf
        } else if self.link.is_some() {
            NodeKind::LeafWithProducts
        } else {
            NodeKind::LeafEmpty
        }
    }
}

/// Parameters of a "show all" gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowAllGate {
    pub category_id: String,
    pub page_size: String,
}

/// Result of looking for a "show all" gate on a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateLookup {
    /// No gate: the page already lists every product
    Absent,

    /// A gate form exists but lacks its required fields
    Incomplete,

    /// A complete gate; the full listing needs a second fetch
    Present(ShowAllGate),
}

/// Name and page URL of one listed product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductMeta {
    pub name: String,
    pub link: Url,
}

/// Compiled storefront selectors
#[derive(Debug, Clone)]
pub struct Selectors {
    anchor: Selector,
    category_menu: Selector,
    show_all_form: Selector,
    category_id_input: Selector,
    page_size_input: Selector,
    product_item: Selector,
    available_count: Selector,
    product_container: Selector,
    product_link: Selector,
    product_name: Selector,
    buy_button: Selector,
    stock_quantity: Selector,
    category_id_field: String,
    page_size_field: String,
}

impl Selectors {
    /// Compiles every selector of the config section
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            anchor: compile("anchor", "a")?,
            category_menu: compile("category-menu", &config.category_menu)?,
            show_all_form: compile("show-all-form", &config.show_all_form)?,
            category_id_input: compile(
                "category-id-field",
                &format!("[name=\"{}\"]", config.category_id_field),
            )?,
            page_size_input: compile(
                "page-size-field",
                &format!("[name=\"{}\"]", config.page_size_field),
            )?,
            product_item: compile("product-item", &config.product_item)?,
            available_count: compile("available-count", &config.available_count)?,
            product_container: compile("product-container", &config.product_container)?,
            product_link: compile("product-link", &config.product_link)?,
            product_name: compile("product-name", &config.product_name)?,
            buy_button: compile("buy-button", &config.buy_button)?,
            stock_quantity: compile("stock-quantity", &config.stock_quantity)?,
            category_id_field: config.category_id_field.clone(),
            page_size_field: config.page_size_field.clone(),
        })
    }

    /// Form field names of the gate, in query order
    pub fn gate_fields(&self) -> (&str, &str) {
        (&self.category_id_field, &self.page_size_field)
    }

    // ===== Category menu =====

    /// Top-level category list of the root page
    pub fn category_menu<'a>(&self, doc: &'a Document) -> Option<ElementRef<'a>> {
        doc.html().select(&self.category_menu).next()
    }

    /// Direct-child `ul` of a category item, if it has sub-categories
    pub fn subcategory_list<'a>(&self, item: ElementRef<'a>) -> Option<ElementRef<'a>> {
        direct_children(item, "ul").into_iter().next()
    }

    /// Direct-child `li` items of a list
    pub fn subcategory_items<'a>(&self, list: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        direct_children(list, "li")
    }

    /// Trimmed text of the item's first link
    pub fn display_name(&self, item: ElementRef<'_>) -> String {
        item.select(&self.anchor)
            .next()
            .map(|a| a.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    /// Absolute target of the item's first link
    pub fn item_link(&self, item: ElementRef<'_>, base: &Url) -> Option<Url> {
        item.select(&self.anchor)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_link(href, base))
    }

    /// Copies the whole category menu of the root page
    ///
    /// Returns None if the page has no category menu.
    pub fn menu_tree(&self, doc: &Document) -> Option<Vec<MenuNode>> {
        let menu = self.category_menu(doc)?;
        Some(
            self.subcategory_items(menu)
                .into_iter()
                .map(|item| self.menu_node(item, doc.url()))
                .collect(),
        )
    }

    fn menu_node(&self, item: ElementRef<'_>, base: &Url) -> MenuNode {
        let children = self
            .subcategory_list(item)
            .map(|list| {
                self.subcategory_items(list)
                    .into_iter()
                    .map(|child| self.menu_node(child, base))
                    .collect()
            })
            .unwrap_or_default();

        MenuNode {
            name: self.display_name(item),
            link: self.item_link(item, base),
            children,
        }
    }

    // ===== Product listings =====

    /// Looks for the "show all" gate on a listing page
    pub fn show_all_gate(&self, doc: &Document) -> GateLookup {
        let Some(form) = doc.html().select(&self.show_all_form).next() else {
            return GateLookup::Absent;
        };

        let value = |selector: &Selector| {
            form.select(selector)
                .next()
                .and_then(|input| input.value().attr("value"))
                .map(|v| v.trim().to_string())
        };

        match (value(&self.category_id_input), value(&self.page_size_input)) {
            (Some(category_id), Some(page_size)) => GateLookup::Present(ShowAllGate {
                category_id,
                page_size,
            }),
            _ => GateLookup::Incomplete,
        }
    }

    /// Number of purchasable products reported by the listing's counter
    pub fn available_count(&self, doc: &Document) -> Option<usize> {
        let text: String = doc
            .html()
            .select(&self.available_count)
            .next()?
            .text()
            .collect();
        let digits = normalize_digits(text.trim().trim_matches(|c| c == '(' || c == ')'));
        digits.trim().parse().ok()
    }

    /// Rendered product list items, in document order
    pub fn product_items<'a>(&self, doc: &'a Document) -> Vec<ElementRef<'a>> {
        doc.html().select(&self.product_item).collect()
    }

    /// Name and absolute page URL of a product item
    pub fn product_meta(&self, item: ElementRef<'_>, base: &Url) -> Option<ProductMeta> {
        let name = item
            .select(&self.product_name)
            .next()?
            .value()
            .attr("content")?
            .trim()
            .to_string();
        let href = item.select(&self.product_link).next()?.value().attr("href")?;
        let link = resolve_link(href, base)?;
        Some(ProductMeta { name, link })
    }

    /// True if the item shows a buy button
    pub fn is_purchasable(&self, item: ElementRef<'_>) -> bool {
        item.select(&self.buy_button).next().is_some()
    }

    /// True if the item wraps a real product
    pub fn has_product_container(&self, item: ElementRef<'_>) -> bool {
        item.select(&self.product_container).next().is_some()
    }

    // ===== Product pages =====

    /// Raw quantity text of a product page
    pub fn stock_quantity(&self, doc: &Document) -> Option<String> {
        let text: String = doc
            .html()
            .select(&self.stock_quantity)
            .next()?
            .text()
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Parses the quantity shown on a product page
///
/// Persian and Arabic-Indic digits are accepted; thousands separators are
/// ignored and anything after the first number (such as a unit) is dropped.
pub fn parse_quantity(text: &str) -> Option<u32> {
    let normalized = normalize_digits(text);
    let number: String = normalized
        .trim_start()
        .chars()
        .filter(|c| *c != ',' && *c != '\u{066C}')
        .take_while(|c| c.is_ascii_digit())
        .collect();
    number.parse().ok()
}

/// Maps Persian and Arabic-Indic digits to ASCII
fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            other => other,
        })
        .collect()
}

fn direct_children<'a>(element: ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == tag)
        .collect()
}

fn compile(name: &'static str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
        name,
        selector: selector.to_string(),
    })
}
