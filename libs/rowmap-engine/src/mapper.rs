use std::ops::Deref;

use rowmap_api::scanner::{RowSet, Scanner};

use crate::error::MapError;

/// Whether mapped output is handed back by value or behind an owned handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantics {
    Value,
    Reference,
}

/// Output of one mapped row.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapped<T> {
    Value(T),
    Reference(Box<T>),
}

impl<T> Mapped<T> {
    pub fn new(value: T, semantics: Semantics) -> Self {
        match semantics {
            Semantics::Value => Mapped::Value(value),
            Semantics::Reference => Mapped::Reference(Box::new(value)),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Mapped::Reference(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Mapped::Value(v) => v,
            Mapped::Reference(b) => *b,
        }
    }

    pub fn into_boxed(self) -> Box<T> {
        match self {
            Mapped::Value(v) => Box::new(v),
            Mapped::Reference(b) => b,
        }
    }
}

impl<T> Deref for Mapped<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            Mapped::Value(v) => v,
            Mapped::Reference(b) => b,
        }
    }
}

/// Maps the scanner's current row into `Output`.
///
/// Mappers hold only immutable metadata: `map()` can be called for every row
/// of a result set in turn. A mapper is not a synchronization point; the
/// scanner it reads from is single-consumer.
pub trait RowMapper {
    type Output;

    fn map(&self, scanner: &mut dyn Scanner) -> Result<Self::Output, MapError>;

    /// Map every remaining row of `rows`, in order. Stops at the first error.
    fn map_all<S: RowSet>(&self, rows: &mut S) -> Result<Vec<Self::Output>, MapError>
    where
        Self: Sized,
    {
        let mut out = Vec::new();
        while rows.advance()? {
            out.push(self.map(rows)?);
        }
        tracing::trace!(rows = out.len(), "result set mapped");
        Ok(out)
    }
}
