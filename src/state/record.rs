//! Catalogue records produced by a crawl
//!
//! Row order is significant: the table written from a `ResultList` is later
//! re-associated with live pages purely by row position, so records are
//! only ever appended.

use crate::state::Stock;
use serde::{Deserialize, Serialize};

/// Parent name given to top-level categories
pub const TOP_PARENT: &str = "none_parent";

/// One row of crawl output
///
/// Field order matches the table's column order:
/// `[parent_category, name, link, stock]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    /// Name of the enclosing category
    pub parent_category: String,

    /// Category or product display name
    pub name: String,

    /// Product page URL (None for category rows)
    pub link: Option<String>,

    /// Stock value
    pub stock: Stock,
}

impl CategoryNode {
    /// Creates a category row
    pub fn category(parent: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            parent_category: parent.into(),
            name: name.into(),
            link: None,
            stock: Stock::NotApplicable,
        }
    }

    /// Creates a product row whose stock is not yet known
    pub fn product(
        parent: impl Into<String>,
        name: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            parent_category: parent.into(),
            name: name.into(),
            link: Some(link.into()),
            stock: Stock::Unresolved,
        }
    }

    /// Returns true if this row describes a product
    pub fn is_product(&self) -> bool {
        self.link.is_some()
    }
}

/// Append-only, ordered accumulator for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultList {
    records: Vec<CategoryNode>,
}

impl ResultList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single record
    pub fn push(&mut self, record: CategoryNode) {
        self.records.push(record);
    }

    /// Appends every record of a branch buffer, keeping its order
    pub fn append(&mut self, mut branch: ResultList) {
        self.records.append(&mut branch.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CategoryNode> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[CategoryNode] {
        &self.records
    }

    /// Number of product rows
    pub fn product_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_product()).count()
    }

    /// Number of category rows
    pub fn category_count(&self) -> usize {
        self.len() - self.product_count()
    }
}

impl<'a> IntoIterator for &'a ResultList {
    type Item = &'a CategoryNode;
    type IntoIter = std::slice::Iter<'a, CategoryNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// The `(link, stock)` projection of a stored row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRow {
    /// Absolute row index in the table
    pub row: usize,

    /// Product page URL (None for category rows)
    pub link: Option<String>,

    /// Stock value as stored, or as refreshed in memory
    pub stock: Stock,
}

/// Walker state for one category menu item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Item has sub-categories to descend into
    NonLeaf,

    /// Item links to a page listing products
    LeafWithProducts,

    /// Item has neither children nor a link
    LeafEmpty,
}
