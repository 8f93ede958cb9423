use crate::value::Value;

/// A value could not be converted into the requested native type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to convert {found} '{value}' into {target}")]
pub struct ConvertError {
    /// Native type name of the destination.
    pub target: &'static str,
    /// Kind of the source value.
    pub found: &'static str,
    /// Textual form of the source value.
    pub value: String,
}

impl ConvertError {
    pub fn new(target: &'static str, value: &Value<'_>) -> Self {
        Self {
            target,
            found: value.type_name(),
            value: value.to_text().into_owned(),
        }
    }
}

/// Scanner error — returned by `Scanner::columns()` and `Scanner::scan()`.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("scanner is not positioned on a row")]
    NoRow,

    #[error("expected {expected} scan targets, got {got}")]
    ColumnCount { expected: usize, got: usize },

    #[error("column '{column}': {source}")]
    Convert {
        column: String,
        #[source]
        source: ConvertError,
    },

    /// Failure reported by the underlying data source.
    #[error("{0}")]
    Source(String),
}

impl ScanError {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }
}

/// Malformed value-translation table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueMapError {
    #[error("value map is empty")]
    Empty,

    #[error("entry '{0}' has no ':' separator")]
    MissingSeparator(String),

    #[error("entry '{0}' has an empty key")]
    EmptyKey(String),

    #[error("duplicate key '{0}'")]
    DuplicateKey(String),
}
