use crate::convert::ScanTarget;
use crate::error::ScanError;
use crate::scanner::{RowSet, Scanner};
use crate::value::Row;

/// In-memory result set. Reference scanner for rows that are already
/// materialized (fixtures, cached query results).
///
/// Text and byte values are handed to targets borrowed, so a target that
/// keeps its own copy (e.g. `String`) is the only allocation per value.
#[derive(Debug, Clone, Default)]
pub struct MemoryScanner {
    columns: Vec<String>,
    rows: Vec<Row>,
    /// `None` until the first `advance()`.
    cursor: Option<usize>,
}

impl MemoryScanner {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            cursor: None,
        }
    }

    /// Scanner already positioned on its only row.
    pub fn single<I, S>(columns: I, row: Row) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut scanner = Self::new(columns).with_row(row);
        scanner.cursor = Some(0);
        scanner
    }

    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn current(&self) -> Result<&Row, ScanError> {
        self.cursor
            .and_then(|i| self.rows.get(i))
            .ok_or(ScanError::NoRow)
    }
}

impl Scanner for MemoryScanner {
    fn columns(&self) -> Result<Vec<String>, ScanError> {
        Ok(self.columns.clone())
    }

    fn scan(&mut self, targets: &mut [&mut dyn ScanTarget]) -> Result<(), ScanError> {
        let row = self.current()?;
        if targets.len() != row.len() {
            return Err(ScanError::ColumnCount {
                expected: row.len(),
                got: targets.len(),
            });
        }
        for ((target, value), column) in targets.iter_mut().zip(row).zip(&self.columns) {
            (**target)
                .assign(value.borrowed())
                .map_err(|source| ScanError::Convert {
                    column: column.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}

impl RowSet for MemoryScanner {
    fn advance(&mut self) -> Result<bool, ScanError> {
        let next = self.cursor.map_or(0, |i| i + 1);
        if next < self.rows.len() {
            self.cursor = Some(next);
            Ok(true)
        } else {
            self.cursor = Some(self.rows.len());
            Ok(false)
        }
    }
}
