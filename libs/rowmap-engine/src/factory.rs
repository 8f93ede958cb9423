use rowmap_api::record::{HasShape, Record, Shape};
use rowmap_api::scanner::Scanner;
use rowmap_api::value::Row;

use crate::columnar::ColumnarMapper;
use crate::config::MappingConfig;
use crate::error::MapError;
use crate::mapper::{Mapped, RowMapper, Semantics};
use crate::structured::StructMapper;

/// Mapper selected from a destination shape.
///
/// | shape | mapper | semantics |
/// |---|---|---|
/// | `R` | [`StructMapper`] | value |
/// | `Box<R>` | [`StructMapper`] | reference |
/// | `Vec<_>` | [`ColumnarMapper`] | value |
/// | `Box<Vec<_>>` | [`ColumnarMapper`] | reference |
///
/// Any other shape is rejected at construction.
pub enum RecordMapper<R> {
    Struct(StructMapper<R>),
    Columnar(ColumnarMapper),
}

/// Output of a [`RecordMapper`].
#[derive(Debug, Clone, PartialEq)]
pub enum MappedRow<R> {
    Record(Mapped<R>),
    Values(Mapped<Row>),
}

impl<R> MappedRow<R> {
    pub fn into_record(self) -> Option<Mapped<R>> {
        match self {
            MappedRow::Record(r) => Some(r),
            MappedRow::Values(_) => None,
        }
    }

    pub fn into_values(self) -> Option<Mapped<Row>> {
        match self {
            MappedRow::Values(v) => Some(v),
            MappedRow::Record(_) => None,
        }
    }
}

impl<R: Record> RecordMapper<R> {
    /// Select the mapper for `shape`. Record shapes must describe `R`.
    pub fn new(shape: &Shape) -> Result<Self, MapError> {
        Self::build(shape, None)
    }

    /// Like [`RecordMapper::new`], with record metadata overlaid by `config`.
    /// Columnar shapes ignore the configuration.
    pub fn with_config(shape: &Shape, config: &MappingConfig) -> Result<Self, MapError> {
        Self::build(shape, Some(config))
    }

    /// Select the mapper for the shape of `T` (`R`, `Box<R>`, `Vec<Value>`, ...).
    pub fn for_type<T: HasShape + ?Sized>() -> Result<Self, MapError> {
        Self::new(&T::shape())
    }

    /// Keep `existing` if given, otherwise build a mapper for `shape`.
    pub fn if_needed(existing: Option<Self>, shape: &Shape) -> Result<Self, MapError> {
        match existing {
            Some(mapper) => Ok(mapper),
            None => Self::new(shape),
        }
    }

    fn build(shape: &Shape, config: Option<&MappingConfig>) -> Result<Self, MapError> {
        let (target, semantics) = match shape {
            Shape::Reference(inner) => (inner.as_ref(), Semantics::Reference),
            other => (other, Semantics::Value),
        };

        match target {
            Shape::Record(_) if *target == R::shape() => {
                let mapper = match config {
                    Some(config) => StructMapper::with_config(semantics, config)?,
                    None => StructMapper::new(semantics)?,
                };
                Ok(RecordMapper::Struct(mapper))
            }
            Shape::Sequence => {
                if config.is_some_and(|c| !c.is_empty()) {
                    tracing::debug!("mapping config ignored for columnar destination");
                }
                Ok(RecordMapper::Columnar(ColumnarMapper::new(semantics)))
            }
            _ => Err(MapError::UnsupportedDestination(shape.clone())),
        }
    }

    pub fn semantics(&self) -> Semantics {
        match self {
            RecordMapper::Struct(m) => m.semantics(),
            RecordMapper::Columnar(m) => m.semantics(),
        }
    }
}

impl<R: Record> RowMapper for RecordMapper<R> {
    type Output = MappedRow<R>;

    fn map(&self, scanner: &mut dyn Scanner) -> Result<MappedRow<R>, MapError> {
        match self {
            RecordMapper::Struct(m) => m.map(scanner).map(MappedRow::Record),
            RecordMapper::Columnar(m) => m.map(scanner).map(MappedRow::Values),
        }
    }
}
