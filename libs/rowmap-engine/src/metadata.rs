use std::borrow::Cow;
use std::collections::HashMap;

use rowmap_api::record::Record;
use rowmap_api::value_map::ValueMap;

use crate::config::MappingConfig;
use crate::error::MapError;

/// Resolved metadata of one destination field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Rust field name.
    pub field: &'static str,
    /// Position in `Record::slots()`.
    pub slot: usize,
    /// `None` → scanned straight into the field.
    pub value_map: Option<ValueMap>,
}

impl FieldDescriptor {
    pub fn is_translated(&self) -> bool {
        self.value_map.is_some()
    }
}

/// Column → field metadata of one record type.
///
/// Built once per mapper, read-only afterwards. Keys are lower-cased column names.
#[derive(Debug, Clone, Default)]
pub struct FieldMetadata {
    by_column: HashMap<String, FieldDescriptor>,
    /// Declared fields, in slot order.
    fields: Vec<FieldDescriptor>,
}

impl FieldMetadata {
    /// Resolve the declared metadata of `R`.
    pub fn resolve<R: Record>() -> Result<Self, MapError> {
        let specs = R::fields();
        let mut fields = Vec::with_capacity(specs.len());
        let mut by_column = HashMap::with_capacity(specs.len());

        for (slot, spec) in specs.iter().enumerate() {
            let value_map = spec
                .value_map
                .map(ValueMap::parse)
                .transpose()
                .map_err(|source| MapError::InvalidValueMap {
                    field: spec.field.to_string(),
                    source,
                })?;
            let descriptor = FieldDescriptor {
                field: spec.field,
                slot,
                value_map,
            };
            by_column.insert(spec.column.to_lowercase(), descriptor.clone());
            fields.push(descriptor);
        }

        Ok(Self { by_column, fields })
    }

    /// Overlay runtime configuration: column aliases and value maps.
    ///
    /// - `field = "..."` adds the column as an alias of that field; the alias
    ///   inherits the field's value map unless it declares its own.
    /// - otherwise the column must already resolve; its value map is replaced.
    pub fn apply_config(&mut self, config: &MappingConfig) -> Result<(), MapError> {
        for (column, entry) in &config.columns {
            let value_map = entry
                .value_map
                .as_ref()
                .map(|spec| spec.to_value_map())
                .transpose()
                .map_err(|source| MapError::InvalidValueMap {
                    field: column.clone(),
                    source,
                })?;
            let key = column.to_lowercase();

            match &entry.field {
                Some(field) => {
                    let base = self
                        .fields
                        .iter()
                        .find(|d| d.field == field.as_str())
                        .ok_or_else(|| {
                            MapError::Config(format!("column '{column}': unknown field '{field}'"))
                        })?;
                    let descriptor = FieldDescriptor {
                        value_map: value_map.or_else(|| base.value_map.clone()),
                        ..base.clone()
                    };
                    tracing::debug!(column = %column, field = %field, "column alias configured");
                    self.by_column.insert(key, descriptor);
                }
                None => {
                    let descriptor = self.by_column.get_mut(&key).ok_or_else(|| {
                        MapError::Config(format!(
                            "column '{column}' does not map to any field (set `field`)"
                        ))
                    })?;
                    if let Some(value_map) = value_map {
                        tracing::debug!(column = %column, field = descriptor.field, "value map configured");
                        descriptor.value_map = Some(value_map);
                    }
                }
            }
        }
        Ok(())
    }

    /// Case-insensitive lookup.
    pub fn get(&self, column: &str) -> Option<&FieldDescriptor> {
        self.by_column.get(&*lowercase(column))
    }

    /// Number of declared fields (= number of record slots).
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Number of resolvable column names, aliases included.
    pub fn column_count(&self) -> usize {
        self.by_column.len()
    }
}

/// Lower-case without allocating when the name already is.
fn lowercase(column: &str) -> Cow<'_, str> {
    if column.chars().any(char::is_uppercase) {
        Cow::Owned(column.to_lowercase())
    } else {
        Cow::Borrowed(column)
    }
}
