use std::collections::BTreeMap;
use std::path::Path;

use rowmap_api::error::ValueMapError;
use rowmap_api::value_map::ValueMap;
use serde::Deserialize;

use crate::error::MapError;

/// Runtime mapping overrides — parsed from TOML.
///
/// ```toml
/// [columns.user_status]
/// field = "status"
/// value_map = { "1" = "ACTIVE", "0" = "INACTIVE" }
///
/// [columns.kind]
/// value_map = "a:ALPHA,b:BETA"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MappingConfig {
    /// Keyed by column name. Applied in key order.
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnConfig {
    /// Map this column onto an existing field (alias).
    #[serde(default)]
    pub field: Option<String>,

    /// Value-translation table for this column.
    #[serde(default)]
    pub value_map: Option<ValueMapConfig>,
}

/// Either the textual `"k1:v1,k2:v2"` form or a TOML table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ValueMapConfig {
    Text(String),
    Table(BTreeMap<String, String>),
}

impl ValueMapConfig {
    pub fn to_value_map(&self) -> Result<ValueMap, ValueMapError> {
        match self {
            ValueMapConfig::Text(spec) => ValueMap::parse(spec),
            ValueMapConfig::Table(table) => ValueMap::from_pairs(table.clone()),
        }
    }
}

impl MappingConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MapError::Config(format!("{}: {e}", path.display())))?;
        Self::parse(&content).map_err(|e| e.with_context(path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, MapError> {
        toml::from_str(toml_str).map_err(|e| MapError::Config(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
