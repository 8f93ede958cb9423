//! Row → record mapping engine.
//!
//! A mapper is selected once per destination shape ([`RecordMapper`]), then
//! called once per row of a result set. Column metadata is resolved at
//! construction and never changes afterwards.

pub mod columnar;
pub mod config;
pub mod error;
pub mod factory;
pub mod mapper;
pub mod metadata;
pub mod structured;
mod translate;

pub use columnar::{scan_row, ColumnarMapper};
pub use config::MappingConfig;
pub use error::MapError;
pub use factory::{MappedRow, RecordMapper};
pub use mapper::{Mapped, RowMapper, Semantics};
pub use metadata::{FieldDescriptor, FieldMetadata};
pub use structured::StructMapper;
