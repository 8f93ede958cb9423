use std::borrow::Cow;

use crate::error::ConvertError;
use crate::value::Value;

/// Type-directed conversion of a generic value into a native type.
///
/// Principle: a value of the matching kind always converts; text is parsed
/// into numeric and boolean targets, and any scalar can be rendered into a
/// `String`. Anything else is a [`ConvertError`].
pub trait FromValue: Sized {
    /// Whether the type can represent an absent value.
    const NULLABLE: bool = false;

    fn from_value(value: Value<'_>) -> Result<Self, ConvertError>;
}

/// Writable slot handed to a scanner.
///
/// Implemented for every [`FromValue`] type, so both a record field and a
/// generic [`Value`] holder can be scan targets.
pub trait ScanTarget {
    fn assign(&mut self, value: Value<'_>) -> Result<(), ConvertError>;

    /// Whether `Value::Null` may be stored in this slot.
    fn accepts_null(&self) -> bool;
}

impl<T: FromValue> ScanTarget for T {
    fn assign(&mut self, value: Value<'_>) -> Result<(), ConvertError> {
        *self = T::from_value(value)?;
        Ok(())
    }

    fn accepts_null(&self) -> bool {
        T::NULLABLE
    }
}

macro_rules! impl_from_value_int {
    ($($t:ty),*) => {$(
        impl FromValue for $t {
            fn from_value(value: Value<'_>) -> Result<Self, ConvertError> {
                let converted = match &value {
                    Value::Int64(n) => <$t>::try_from(*n).ok(),
                    Value::UInt64(n) => <$t>::try_from(*n).ok(),
                    Value::Bool(b) => Some(<$t>::from(*b)),
                    Value::Decimal(n, 0) => <$t>::try_from(*n).ok(),
                    Value::Float32(f) if f.is_finite() && f.fract() == 0.0 => {
                        <$t>::try_from(*f as i128).ok()
                    }
                    Value::Float64(f) if f.is_finite() && f.fract() == 0.0 => {
                        <$t>::try_from(*f as i128).ok()
                    }
                    Value::Text(_) | Value::Bytes(_) => value.to_text().trim().parse::<$t>().ok(),
                    _ => None,
                };
                converted.ok_or_else(|| ConvertError::new(stringify!($t), &value))
            }
        }
    )*};
}

impl_from_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_from_value_float {
    ($($t:ty),*) => {$(
        impl FromValue for $t {
            fn from_value(value: Value<'_>) -> Result<Self, ConvertError> {
                let converted = match &value {
                    Value::Float32(f) => Some(*f as $t),
                    Value::Float64(f) => Some(*f as $t),
                    Value::Int64(n) => Some(*n as $t),
                    Value::UInt64(n) => Some(*n as $t),
                    Value::Decimal(n, scale) => Some((*n as f64 / 10f64.powi(i32::from(*scale))) as $t),
                    Value::Text(_) | Value::Bytes(_) => value.to_text().trim().parse::<$t>().ok(),
                    _ => None,
                };
                converted.ok_or_else(|| ConvertError::new(stringify!($t), &value))
            }
        }
    )*};
}

impl_from_value_float!(f32, f64);

impl FromValue for bool {
    fn from_value(value: Value<'_>) -> Result<Self, ConvertError> {
        let converted = match &value {
            Value::Bool(b) => Some(*b),
            Value::Int64(n) => Some(*n != 0),
            Value::UInt64(n) => Some(*n != 0),
            Value::Text(_) | Value::Bytes(_) => parse_bool(&value.to_text()),
            _ => None,
        };
        converted.ok_or_else(|| ConvertError::new("bool", &value))
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

impl FromValue for String {
    fn from_value(value: Value<'_>) -> Result<Self, ConvertError> {
        match value {
            Value::Null => Err(ConvertError::new("String", &value)),
            Value::Text(s) => Ok(s.into_owned()),
            Value::Bytes(b) => Ok(String::from_utf8_lossy(&b).into_owned()),
            other => Ok(other.to_text().into_owned()),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value<'_>) -> Result<Self, ConvertError> {
        match value {
            Value::Bytes(b) => Ok(b.into_owned()),
            Value::Text(s) => Ok(s.into_owned().into_bytes()),
            other => Err(ConvertError::new("Vec<u8>", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const NULLABLE: bool = true;

    fn from_value(value: Value<'_>) -> Result<Self, ConvertError> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_value(value).map(Some)
    }
}

/// Generic holder: keeps whatever the scanner produced.
impl FromValue for Value<'static> {
    const NULLABLE: bool = true;

    fn from_value(value: Value<'_>) -> Result<Self, ConvertError> {
        Ok(value.into_owned())
    }
}

/// Assign textual `value` into `target`, converting to the target's type.
pub fn assign_converted<T: ScanTarget + ?Sized>(
    target: &mut T,
    value: &str,
) -> Result<(), ConvertError> {
    target.assign(Value::Text(Cow::Borrowed(value)))
}
