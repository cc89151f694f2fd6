//! CSV-backed table store
//!
//! The table has no header row. Columns are fixed:
//! `[parent_category, name, link, stock]`; any extra columns are carried
//! through stock updates untouched.

use crate::state::{CategoryNode, Stock, StockRow};
use crate::storage::traits::{RowRange, Store, StoreError, StoreResult};
use csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const LINK_COLUMN: usize = 2;
const STOCK_COLUMN: usize = 3;
const MIN_COLUMNS: usize = 4;

/// Table store backed by a single CSV file
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every raw row of the table
    fn read_table(&self) -> StoreResult<Vec<StringRecord>> {
        if !self.exists() {
            return Err(StoreError::MissingTable(self.path.clone()));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?);
        }
        Ok(rows)
    }

    /// Reads every row back as a record
    pub fn read_records(&self) -> StoreResult<Vec<CategoryNode>> {
        self.read_table()?
            .iter()
            .map(|record| record.deserialize(None).map_err(StoreError::from))
            .collect()
    }

    /// Writes a fresh table through a temp file, then swaps it into place
    fn replace_table<F>(&self, fill: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Writer<BufWriter<File>>) -> StoreResult<()>,
    {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = temp_path(&self.path);
        {
            let file = File::create(&tmp)?;
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_writer(BufWriter::new(file));
            fill(&mut writer)?;
            writer.flush()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Store for CsvStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn write_records(&mut self, records: &[CategoryNode]) -> StoreResult<()> {
        info!(
            "Writing {} rows to {}",
            records.len(),
            self.path.display()
        );

        self.replace_table(|writer| {
            for record in records {
                writer.serialize(record)?;
            }
            Ok(())
        })
    }

    fn row_count(&self) -> StoreResult<usize> {
        Ok(self.read_table()?.len())
    }

    fn read_stock_rows(&self, range: RowRange) -> StoreResult<Vec<StockRow>> {
        let table = self.read_table()?;
        let (start, end) = range.resolve(table.len())?;
        debug!("Reading stock rows {}..{} of {}", start, end, table.len());

        table[start..end]
            .iter()
            .enumerate()
            .map(|(offset, record)| stock_row(start + offset, record))
            .collect()
    }

    fn write_stock(&mut self, updates: &[StockRow]) -> StoreResult<()> {
        let mut table = self.read_table()?;
        let rows = table.len();

        for update in updates {
            let record = table.get(update.row).ok_or(StoreError::RangeOutOfBounds {
                start: update.row,
                end: update.row + 1,
                rows,
            })?;

            let found = link_cell(record);
            if found != update.link {
                return Err(StoreError::RowMismatch {
                    row: update.row,
                    expected: update.link.clone(),
                    found,
                });
            }

            let patched = with_stock(record, update.stock);
            table[update.row] = patched;
        }

        debug!(
            "Rewriting {} with {} stock updates",
            self.path.display(),
            updates.len()
        );
        self.replace_table(|writer| {
            for record in &table {
                writer.write_record(record)?;
            }
            Ok(())
        })
    }
}

/// Projects a raw row onto `(link, stock)`
fn stock_row(row: usize, record: &StringRecord) -> StoreResult<StockRow> {
    let cell = record.get(STOCK_COLUMN).unwrap_or("");
    let stock = Stock::from_cell(cell).ok_or_else(|| StoreError::InvalidStock {
        row,
        cell: cell.to_string(),
    })?;

    Ok(StockRow {
        row,
        link: link_cell(record),
        stock,
    })
}

fn link_cell(record: &StringRecord) -> Option<String> {
    record
        .get(LINK_COLUMN)
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .map(str::to_string)
}

/// Returns a copy of `record` with its stock column replaced
fn with_stock(record: &StringRecord, stock: Stock) -> StringRecord {
    let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
    if fields.len() < MIN_COLUMNS {
        fields.resize(MIN_COLUMNS, String::new());
    }
    fields[STOCK_COLUMN] = stock.to_cell();
    StringRecord::from(fields)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
