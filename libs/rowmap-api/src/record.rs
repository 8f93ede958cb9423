use std::fmt;

use crate::convert::ScanTarget;

/// Static description of one record field, as declared on the type.
///
/// Emitted by `#[derive(Record)]`:
///
/// ```ignore
/// #[derive(Record, Default)]
/// pub struct Account {
///     pub id: i64,
///     #[column(name = "acct_status", value_map = "1:ACTIVE,0:INACTIVE")]
///     pub status: String,
///     #[column(skip)]
///     pub cached: bool,
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name; matched case-insensitively.
    pub column: &'static str,
    /// Rust field name (for error messages).
    pub field: &'static str,
    /// Value-translation table in textual form (`"k1:v1,k2:v2"`).
    pub value_map: Option<&'static str>,
}

/// A destination record: a struct with named, individually scannable fields.
///
/// `slots()` must return exactly one target per entry of `fields()`, in the
/// same order. Slot index = position in `fields()`.
pub trait Record: Default + HasShape {
    fn fields() -> &'static [FieldSpec];

    fn slots(&mut self) -> Vec<&mut dyn ScanTarget>;
}

/// Empty record. Useful as the record type of a factory that only ever
/// builds columnar mappers.
impl Record for () {
    fn fields() -> &'static [FieldSpec] {
        &[]
    }

    fn slots(&mut self) -> Vec<&mut dyn ScanTarget> {
        Vec::new()
    }
}

/// Destination shape descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Structured record with named fields (full type path).
    Record(&'static str),
    /// Positional sequence of values.
    Sequence,
    /// Owned handle to the inner shape.
    Reference(Box<Shape>),
    /// Anything else (primitive scalar types, ...).
    Scalar(&'static str),
}

impl Shape {
    pub fn of<T: HasShape + ?Sized>() -> Self {
        T::shape()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Record(name) => write!(f, "record {name}"),
            Shape::Sequence => f.write_str("sequence"),
            Shape::Reference(inner) => write!(f, "reference to {inner}"),
            Shape::Scalar(name) => write!(f, "scalar {name}"),
        }
    }
}

/// Maps a Rust type to its [`Shape`].
pub trait HasShape {
    fn shape() -> Shape;
}

impl HasShape for () {
    fn shape() -> Shape {
        Shape::Record("()")
    }
}

impl<T> HasShape for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence
    }
}

impl<T> HasShape for [T] {
    fn shape() -> Shape {
        Shape::Sequence
    }
}

impl<T: HasShape + ?Sized> HasShape for Box<T> {
    fn shape() -> Shape {
        Shape::Reference(Box::new(T::shape()))
    }
}

macro_rules! impl_scalar_shape {
    ($($t:ty),*) => {$(
        impl HasShape for $t {
            fn shape() -> Shape {
                Shape::Scalar(stringify!($t))
            }
        }
    )*};
}

impl_scalar_shape!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, str
);
