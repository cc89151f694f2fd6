//! Command surface: choosing between a crawl and a stock refresh
//!
//! The interactive prompt asks for a mode (`1` crawl and save, `2` refresh
//! stock) and, for a refresh, a start and end row. At the prompt the value
//! `1` stands for "use the implicit bound": row 0 for the start, the end of
//! the table for the end. Invalid answers are reported and the whole
//! command is asked again.

use crate::storage::RowRange;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Prompt value meaning "use the implicit bound"
pub const IMPLICIT_BOUND: usize = 1;

/// Errors produced while reading a command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown mode {0:?}: enter 1 to crawl or 2 to refresh stock")]
    UnknownMode(String),

    #[error("Expected a row number, got {0:?}")]
    InvalidNumber(String),

    #[error("Invalid range: start row {start} is not before end row {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("Invalid range: rows {start}..{end} do not fit a table of {rows} rows")]
    OutsideTable {
        start: usize,
        end: usize,
        rows: usize,
    },

    #[error("Input ended before a command was complete")]
    EndOfInput,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// What the operator asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Crawl the whole site and replace the table
    Crawl,

    /// Refresh stock for a row range of the existing table
    Refresh(RowRange),
}

/// Builds a row range from prompt answers
///
/// `1` means the implicit bound on either side. When both answers are
/// explicit rows, `start` must come before `end`.
///
/// # Examples
///
/// ```
/// use stock_scout::command::range_from_prompt;
/// use stock_scout::storage::RowRange;
///
/// assert_eq!(range_from_prompt(1, 1).unwrap(), RowRange::new(0, None));
/// assert_eq!(range_from_prompt(4, 9).unwrap(), RowRange::new(4, Some(9)));
/// assert!(range_from_prompt(10, 3).is_err());
/// ```
pub fn range_from_prompt(start: usize, end: usize) -> Result<RowRange, CommandError> {
    if start != IMPLICIT_BOUND && end != IMPLICIT_BOUND && start >= end {
        return Err(CommandError::InvalidRange { start, end });
    }

    let start = if start == IMPLICIT_BOUND { 0 } else { start };
    let end = if end == IMPLICIT_BOUND { None } else { Some(end) };
    Ok(RowRange::new(start, end))
}

/// Builds a row range from explicit 0-based command-line bounds
pub fn range_from_args(start: Option<usize>, end: Option<usize>) -> Result<RowRange, CommandError> {
    let start_row = start.unwrap_or(0);
    if let Some(end_row) = end {
        if start_row >= end_row {
            return Err(CommandError::InvalidRange {
                start: start_row,
                end: end_row,
            });
        }
    }
    Ok(RowRange::new(start_row, end))
}

fn parse_row(answer: &str) -> Result<usize, CommandError> {
    answer
        .parse()
        .map_err(|_| CommandError::InvalidNumber(answer.to_string()))
}

/// Line-based interactive prompt
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks until a complete, valid command is given
    ///
    /// `table_rows` is consulted for a refresh and yields the row count of
    /// the table, or None when there is no readable table. Without one the
    /// operator is sent back to choose a crawl; a range reaching past the
    /// table is asked again.
    pub fn next_command<F>(&mut self, table_rows: F) -> Result<Mode, CommandError>
    where
        F: Fn() -> Option<usize>,
    {
        loop {
            match self.try_command(&table_rows) {
                Ok(mode) => return Ok(mode),
                Err(e @ (CommandError::EndOfInput | CommandError::Io(_))) => return Err(e),
                Err(e) => {
                    tracing::debug!("Rejected command: {}", e);
                    writeln!(self.output, "{}. Please try again.", e)?;
                }
            }
        }
    }

    fn try_command<F>(&mut self, table_rows: &F) -> Result<Mode, CommandError>
    where
        F: Fn() -> Option<usize>,
    {
        let mode = self.ask("Enter 1 to crawl the site into a new table, or 2 to refresh stock: ")?;
        match mode.as_str() {
            "1" => {
                writeln!(self.output, "Crawling the site into a new table")?;
                Ok(Mode::Crawl)
            }
            "2" => {
                let Some(rows) = table_rows() else {
                    writeln!(
                        self.output,
                        "The table file does not exist; enter 1 to crawl the site first"
                    )?;
                    return self.try_command(table_rows);
                };

                let start = parse_row(&self.ask(
                    "Start row (1 to start from the beginning): ",
                )?)?;
                let end = parse_row(&self.ask("End row (1 to run until the end): ")?)?;
                let range = range_from_prompt(start, end)?;
                range
                    .resolve(rows)
                    .map_err(|_| CommandError::OutsideTable {
                        start: range.start,
                        end: range.end.unwrap_or(rows),
                        rows,
                    })?;

                match range.end {
                    Some(end) => writeln!(
                        self.output,
                        "Refreshing stock from row {} until row {}",
                        range.start, end
                    )?,
                    None => writeln!(
                        self.output,
                        "Refreshing stock from row {} until the end",
                        range.start
                    )?,
                }
                Ok(Mode::Refresh(range))
            }
            other => Err(CommandError::UnknownMode(other.to_string())),
        }
    }

    fn ask(&mut self, question: &str) -> Result<String, CommandError> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CommandError::EndOfInput);
        }
        Ok(line.trim().to_string())
    }
}
