//! Whitespace-delimited numeric tables.
//!
//! Every data row is one time step: a time stamp followed by a fixed number
//! of values. Lines before the first numeric row (storage-file headers ending
//! in `endheader`, column labels) are skipped, as are blank lines.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::trace;

use crate::error::AnalysisError;
use crate::Result;

/// One numeric input stream with a fixed column count.
#[derive(Debug)]
pub struct NumericTable<R> {
    name: String,
    reader: R,
    columns: usize,
    line: usize,
    rows: usize,
    in_data: bool,
    buf: String,
}

impl NumericTable<BufReader<File>> {
    /// Open a file as a table with `columns` columns per row.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Open`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, columns: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| AnalysisError::open(path, e))?;
        Ok(Self::new(
            path.display().to_string(),
            BufReader::new(file),
            columns,
        ))
    }
}

impl<R: BufRead> NumericTable<R> {
    /// Wrap a reader. `name` is used in error messages.
    pub fn new(name: impl Into<String>, reader: R, columns: usize) -> Self {
        Self {
            name: name.into(),
            reader,
            columns,
            line: 0,
            rows: 0,
            in_data: false,
            buf: String::new(),
        }
    }

    /// Stream name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns per row, including the time column.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Data rows returned so far.
    pub fn rows_read(&self) -> usize {
        self.rows
    }

    /// Read the next data row, or `None` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Read`] on I/O failure,
    /// [`AnalysisError::Malformed`] for a non-numeric or non-finite token in a
    /// data row and [`AnalysisError::ColumnCount`] for a row of the wrong
    /// width.
    pub fn next_row(&mut self) -> Result<Option<Vec<f64>>> {
        loop {
            self.buf.clear();
            let n = self
                .reader
                .read_line(&mut self.buf)
                .map_err(|source| AnalysisError::Read {
                    stream: self.name.clone(),
                    line: self.line,
                    source,
                })?;
            if n == 0 {
                return Ok(None);
            }
            self.line += 1;

            let mut tokens = self.buf.split_whitespace().peekable();
            let Some(first) = tokens.peek() else {
                continue;
            };
            if !self.in_data {
                if first.parse::<f64>().is_err() {
                    trace!(stream = %self.name, line = self.line, "skipping header line");
                    continue;
                }
                self.in_data = true;
            }

            let row = tokens
                .map(|token| {
                    token
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| AnalysisError::Malformed {
                            stream: self.name.clone(),
                            line: self.line,
                            token: token.to_string(),
                        })
                })
                .collect::<Result<Vec<f64>>>()?;

            if row.len() != self.columns {
                return Err(AnalysisError::ColumnCount {
                    stream: self.name.clone(),
                    line: self.line,
                    expected: self.columns,
                    found: row.len(),
                });
            }
            self.rows += 1;
            return Ok(Some(row));
        }
    }
}
