use crate::convert::ScanTarget;
use crate::error::ScanError;

/// Scanning interface — the row source the mappers read from.
///
/// The core never knows concrete drivers. For the core, a row source is
/// just this trait:
///
/// - `columns()` — ordered column names of the current row.
/// - `scan()` — writes one value per column into the caller's slots, in
///   column order. Values may borrow the scanner's row buffer; they are
///   only valid until the next `scan()`.
///
/// Single consumer: a scanner is never shared between threads while scanning.
pub trait Scanner {
    fn columns(&self) -> Result<Vec<String>, ScanError>;

    fn scan(&mut self, targets: &mut [&mut dyn ScanTarget]) -> Result<(), ScanError>;
}

/// A scanner over a whole result set.
pub trait RowSet: Scanner {
    /// Move to the next row. Returns `false` once the result set is exhausted.
    fn advance(&mut self) -> Result<bool, ScanError>;
}
