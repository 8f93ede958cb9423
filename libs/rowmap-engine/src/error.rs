use rowmap_api::error::{ConvertError, ScanError, ValueMapError};
use rowmap_api::record::Shape;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("unable to map column '{0}' to the result")]
    UnmappedColumn(String),

    #[error("column '{0}' targets a field that is already bound in this row")]
    DuplicateColumn(String),

    #[error("failed to apply value map on {0}, unable to set nil")]
    CannotAssignNil(String),

    #[error(
        "failed to map {field}: no value mapping for '{value}', want one of [{}]",
        .valid_keys.join(",")
    )]
    TranslationMiss {
        field: String,
        value: String,
        valid_keys: Vec<String>,
    },

    #[error("failed to map {field}: {source}")]
    Conversion {
        field: String,
        #[source]
        source: ConvertError,
    },

    #[error("failed to scan row: {0}")]
    Scan(#[from] ScanError),

    #[error("unsupported destination: {0}")]
    UnsupportedDestination(Shape),

    #[error("invalid value map for {field}: {source}")]
    InvalidValueMap {
        field: String,
        #[source]
        source: ValueMapError,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl MapError {
    /// Add context to the error.
    ///
    /// Only `Config` carries a free-form message; other variants are
    /// structured and returned unchanged.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            MapError::Config(msg) => MapError::Config(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}
