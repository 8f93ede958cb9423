use std::borrow::Cow;

use serde::ser::{Serialize, Serializer};

/// Generic column value, as produced by a scanner.
///
/// Strategy by type:
/// - Scalars (Int64, Float64, Bool): eager, cost ~0
/// - Decimal, Timestamp: eager, binary layout differs between sources
/// - Text, Bytes: `Cow` (borrowed from the scanner's row buffer when possible)
///
/// A borrowed value is only valid until the next `scan()` on the same scanner.
/// Use [`Value::into_owned`] to keep it longer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value<'a> {
    #[default]
    Null,
    Bool(bool),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    /// `(value, scale)`.
    Decimal(i128, u8),
    /// `(micros, precision)`.
    Timestamp(i64, u8),

    Text(Cow<'a, str>),
    /// Raw bytes, not necessarily UTF-8.
    Bytes(Cow<'a, [u8]>),
}

impl<'a> Value<'a> {
    pub fn text(s: impl Into<Cow<'a, str>>) -> Self {
        Value::Text(s.into())
    }

    pub fn bytes(b: impl Into<Cow<'a, [u8]>>) -> Self {
        Value::Bytes(b.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short type name, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int64(_) => "int64",
            Value::UInt64(_) => "uint64",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::Decimal(..) => "decimal",
            Value::Timestamp(..) => "timestamp",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
        }
    }

    /// Detach from any borrowed row buffer.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(v) => Value::Bool(v),
            Value::Int64(v) => Value::Int64(v),
            Value::UInt64(v) => Value::UInt64(v),
            Value::Float32(v) => Value::Float32(v),
            Value::Float64(v) => Value::Float64(v),
            Value::Decimal(v, s) => Value::Decimal(v, s),
            Value::Timestamp(v, p) => Value::Timestamp(v, p),
            Value::Text(s) => Value::Text(Cow::Owned(s.into_owned())),
            Value::Bytes(b) => Value::Bytes(Cow::Owned(b.into_owned())),
        }
    }

    /// Re-borrow without copying text or byte payloads.
    pub fn borrowed(&self) -> Value<'_> {
        match self {
            Value::Text(s) => Value::Text(Cow::Borrowed(s.as_ref())),
            Value::Bytes(b) => Value::Bytes(Cow::Borrowed(b.as_ref())),
            Value::Null => Value::Null,
            Value::Bool(v) => Value::Bool(*v),
            Value::Int64(v) => Value::Int64(*v),
            Value::UInt64(v) => Value::UInt64(*v),
            Value::Float32(v) => Value::Float32(*v),
            Value::Float64(v) => Value::Float64(*v),
            Value::Decimal(v, s) => Value::Decimal(*v, *s),
            Value::Timestamp(v, p) => Value::Timestamp(*v, *p),
        }
    }

    /// Byte sequences become text; everything else passes through unchanged.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD.
    pub fn normalize_text(self) -> Self {
        match self {
            Value::Bytes(Cow::Borrowed(b)) => Value::Text(String::from_utf8_lossy(b)),
            Value::Bytes(Cow::Owned(b)) => match String::from_utf8(b) {
                Ok(s) => Value::Text(Cow::Owned(s)),
                Err(e) => Value::Text(Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned())),
            },
            other => other,
        }
    }

    /// Textual form of the value. Bytes are taken verbatim, null is empty.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Bool(v) => Cow::Borrowed(if *v { "true" } else { "false" }),
            Value::Int64(v) => Cow::Owned(v.to_string()),
            Value::UInt64(v) => Cow::Owned(v.to_string()),
            Value::Float32(v) => Cow::Owned(v.to_string()),
            Value::Float64(v) => Cow::Owned(v.to_string()),
            Value::Decimal(v, scale) => Cow::Owned(format_decimal(*v, *scale)),
            Value::Timestamp(micros, _) => Cow::Owned(micros.to_string()),
            Value::Text(s) => Cow::Borrowed(s.as_ref()),
            Value::Bytes(b) => String::from_utf8_lossy(b),
        }
    }
}

impl From<i64> for Value<'_> {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::Text(Cow::Borrowed(v))
    }
}

impl From<String> for Value<'_> {
    fn from(v: String) -> Self {
        Value::Text(Cow::Owned(v))
    }
}

impl Serialize for Value<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int64(v) => serializer.serialize_i64(*v),
            Value::UInt64(v) => serializer.serialize_u64(*v),
            Value::Float32(v) => serializer.serialize_f32(*v),
            Value::Float64(v) => serializer.serialize_f64(*v),
            Value::Timestamp(micros, _) => serializer.serialize_i64(*micros),
            // Decimals keep their scale as text; bytes are emitted lossily.
            Value::Decimal(..) | Value::Text(_) | Value::Bytes(_) => {
                serializer.serialize_str(&self.to_text())
            }
        }
    }
}

fn format_decimal(value: i128, scale: u8) -> String {
    if scale == 0 {
        return value.to_string();
    }
    let scale = scale as usize;
    let digits = value.unsigned_abs().to_string();
    let padded = if digits.len() <= scale {
        format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
    } else {
        digits
    };
    let (int, frac) = padded.split_at(padded.len() - scale);
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}{int}.{frac}")
}

/// Positional row of owned values. Order matches the scanner's columns.
pub type Row = Vec<Value<'static>>;
