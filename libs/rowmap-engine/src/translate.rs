use rowmap_api::convert::{assign_converted, ScanTarget};
use rowmap_api::record::Record;
use rowmap_api::value::Value;

use crate::error::MapError;
use crate::metadata::FieldDescriptor;

/// Raw value of one translated column, held until the row is scanned.
struct Pending<'m> {
    column: String,
    descriptor: &'m FieldDescriptor,
    raw: Value<'static>,
}

/// Generic holders for the translated columns of one row.
///
/// Holders are bound as scan targets in place of the fields; after the scan,
/// [`Translations::apply`] rewrites each raw value through the field's
/// value map and assigns the result.
pub(crate) struct Translations<'m> {
    pending: Vec<Pending<'m>>,
}

impl<'m> Translations<'m> {
    /// One holder per column whose descriptor carries a value map.
    ///
    /// `count` is the number of such columns; no allocation when it is zero.
    pub(crate) fn allocate(
        count: usize,
        columns: &[String],
        descriptors: &[&'m FieldDescriptor],
    ) -> Self {
        if count == 0 {
            return Self { pending: Vec::new() };
        }
        let mut pending = Vec::with_capacity(count);
        for (column, descriptor) in columns.iter().zip(descriptors) {
            if descriptor.is_translated() {
                pending.push(Pending {
                    column: column.clone(),
                    descriptor,
                    raw: Value::Null,
                });
            }
        }
        Self { pending }
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    /// Holders in column order, as scan targets.
    pub(crate) fn holders_mut(&mut self) -> impl Iterator<Item = &mut dyn ScanTarget> {
        self.pending
            .iter_mut()
            .map(|p| &mut p.raw as &mut dyn ScanTarget)
    }

    /// Translate every held value and assign it to its field.
    pub(crate) fn apply<R: Record>(self, record: &mut R) -> Result<(), MapError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut slots = record.slots();
        for pending in self.pending {
            let descriptor = pending.descriptor;
            // Slots were range-checked by the binder; a miss means a bad `Record` impl.
            let slot = slots
                .get_mut(descriptor.slot)
                .ok_or_else(|| MapError::DuplicateColumn(pending.column.clone()))?;
            translate_into(&mut **slot, descriptor, &pending.raw)?;
        }
        Ok(())
    }
}

fn translate_into<T: ScanTarget + ?Sized>(
    slot: &mut T,
    descriptor: &FieldDescriptor,
    raw: &Value<'static>,
) -> Result<(), MapError> {
    let Some(value_map) = &descriptor.value_map else {
        return Ok(());
    };

    // Null bypasses the table and lands on the field as it would untranslated.
    if raw.is_null() {
        if !slot.accepts_null() {
            return Err(MapError::CannotAssignNil(descriptor.field.to_string()));
        }
        return slot
            .assign(Value::Null)
            .map_err(|source| MapError::Conversion {
                field: descriptor.field.to_string(),
                source,
            });
    }

    // Byte sequences are taken verbatim as text.
    let text = raw.to_text();
    match value_map.get(&text) {
        Some(translated) => {
            assign_converted(slot, translated).map_err(|source| MapError::Conversion {
                field: descriptor.field.to_string(),
                source,
            })
        }
        None => Err(MapError::TranslationMiss {
            field: descriptor.field.to_string(),
            value: text.into_owned(),
            valid_keys: value_map.keys().map(str::to_owned).collect(),
        }),
    }
}
