pub mod convert;
pub mod error;
pub mod memory;
pub mod record;
pub mod scanner;
pub mod value;
pub mod value_map;

pub use rowmap_derive::Record;

pub use convert::{FromValue, ScanTarget};
pub use error::{ConvertError, ScanError, ValueMapError};
pub use memory::MemoryScanner;
pub use record::{FieldSpec, HasShape, Record, Shape};
pub use scanner::{RowSet, Scanner};
pub use value::{Row, Value};
pub use value_map::ValueMap;
