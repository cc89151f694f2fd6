//! Storage traits and error types
//!
//! This module defines the trait interface for table stores and
//! associated error types.

use crate::state::{CategoryNode, StockRow};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Table file not found: {0}")]
    MissingTable(PathBuf),

    #[error("Row range {start}..{end} is outside a table of {rows} rows")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        rows: usize,
    },

    #[error("Expected {expected} rows for the range, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Row {row} no longer matches: expected link {expected:?}, found {found:?}")]
    RowMismatch {
        row: usize,
        expected: Option<String>,
        found: Option<String>,
    },

    #[error("Invalid stock cell {cell:?} in row {row}")]
    InvalidStock { row: usize, cell: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A half-open row range `[start, end)` over the table
///
/// `end = None` means "up to the last row".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl RowRange {
    /// The whole table
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// Resolves the range against a table of `rows` rows
    ///
    /// Returns the concrete `(start, end)` bounds, or an error when the
    /// range reaches past the table.
    pub fn resolve(&self, rows: usize) -> StoreResult<(usize, usize)> {
        let end = self.end.unwrap_or(rows);
        if self.start > end || end > rows {
            return Err(StoreError::RangeOutOfBounds {
                start: self.start,
                end,
                rows,
            });
        }
        Ok((self.start, end))
    }
}

/// Trait for table store implementations
///
/// Rows are addressed by absolute position. Row `i` of the table is the
/// `i`-th record appended during the crawl that produced it.
pub trait Store {
    /// Returns true if the backing table exists
    fn exists(&self) -> bool;

    /// Replaces the whole table with the given records, in order
    fn write_records(&mut self, records: &[CategoryNode]) -> StoreResult<()>;

    /// Number of rows in the table
    fn row_count(&self) -> StoreResult<usize>;

    /// Reads the `(link, stock)` projection of rows in `range`
    ///
    /// The returned vector has exactly `end - start` entries.
    fn read_stock_rows(&self, range: RowRange) -> StoreResult<Vec<StockRow>>;

    /// Rewrites the stock column of the addressed rows
    ///
    /// Each update's link must still match the stored link of its row;
    /// the whole table is rewritten even though only some rows change.
    fn write_stock(&mut self, updates: &[StockRow]) -> StoreResult<()>;
}
