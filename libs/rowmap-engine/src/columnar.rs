use rowmap_api::convert::ScanTarget;
use rowmap_api::scanner::Scanner;
use rowmap_api::value::{Row, Value};

use crate::error::MapError;
use crate::mapper::{Mapped, RowMapper, Semantics};

/// Scan the current row into a positional sequence of values.
///
/// Returns the values in column order together with the column names.
/// Byte sequences are normalized to text; every other value passes through.
pub fn scan_row(scanner: &mut dyn Scanner) -> Result<(Row, Vec<String>), MapError> {
    let columns = scanner.columns()?;
    let mut values: Row = vec![Value::Null; columns.len()];
    {
        let mut targets: Vec<&mut dyn ScanTarget> = values
            .iter_mut()
            .map(|v| v as &mut dyn ScanTarget)
            .collect();
        scanner.scan(&mut targets)?;
    }
    let values = values.into_iter().map(Value::normalize_text).collect();
    Ok((values, columns))
}

/// Maps rows into positional value sequences, no field names involved.
#[derive(Debug, Clone, Copy)]
pub struct ColumnarMapper {
    semantics: Semantics,
}

impl ColumnarMapper {
    pub fn new(semantics: Semantics) -> Self {
        tracing::debug!(semantics = ?semantics, "built columnar mapper");
        Self { semantics }
    }

    pub fn semantics(&self) -> Semantics {
        self.semantics
    }
}

impl RowMapper for ColumnarMapper {
    type Output = Mapped<Row>;

    fn map(&self, scanner: &mut dyn Scanner) -> Result<Mapped<Row>, MapError> {
        let (values, _) = scan_row(scanner)?;
        Ok(Mapped::new(values, self.semantics))
    }
}
