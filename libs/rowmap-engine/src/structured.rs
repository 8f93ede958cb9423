use std::marker::PhantomData;
use std::sync::Arc;

use rowmap_api::convert::ScanTarget;
use rowmap_api::record::Record;
use rowmap_api::scanner::Scanner;

use crate::config::MappingConfig;
use crate::error::MapError;
use crate::mapper::{Mapped, RowMapper, Semantics};
use crate::metadata::{FieldDescriptor, FieldMetadata};
use crate::translate::Translations;

/// Maps rows into records of type `R`.
///
/// Column → field metadata is resolved once, at construction. Per row, each
/// column is bound either straight to its field (no intermediate copy) or,
/// when the field declares a value map, to a generic holder that is
/// translated after the scan.
pub struct StructMapper<R> {
    metadata: Arc<FieldMetadata>,
    semantics: Semantics,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> StructMapper<R> {
    pub fn new(semantics: Semantics) -> Result<Self, MapError> {
        Ok(Self::with_metadata(
            Arc::new(FieldMetadata::resolve::<R>()?),
            semantics,
        ))
    }

    /// Declared metadata overlaid with runtime configuration.
    pub fn with_config(semantics: Semantics, config: &MappingConfig) -> Result<Self, MapError> {
        let mut metadata = FieldMetadata::resolve::<R>()?;
        metadata.apply_config(config)?;
        Ok(Self::with_metadata(Arc::new(metadata), semantics))
    }

    /// Share already-resolved metadata between mappers of the same record type.
    pub fn with_metadata(metadata: Arc<FieldMetadata>, semantics: Semantics) -> Self {
        tracing::debug!(
            record = std::any::type_name::<R>(),
            semantics = ?semantics,
            fields = metadata.field_count(),
            columns = metadata.column_count(),
            "built record mapper"
        );
        Self {
            metadata,
            semantics,
            _record: PhantomData,
        }
    }

    pub fn metadata(&self) -> &Arc<FieldMetadata> {
        &self.metadata
    }

    pub fn semantics(&self) -> Semantics {
        self.semantics
    }

    /// Descriptor of every column, in column order. Rejects unmapped columns
    /// and columns that land on an already bound field.
    fn bind<'m>(&'m self, columns: &[String]) -> Result<Vec<&'m FieldDescriptor>, MapError> {
        let mut bound = vec![false; self.metadata.field_count()];
        let mut descriptors = Vec::with_capacity(columns.len());
        for column in columns {
            let descriptor = self
                .metadata
                .get(column)
                .ok_or_else(|| MapError::UnmappedColumn(column.clone()))?;
            match bound.get_mut(descriptor.slot) {
                Some(taken) if !*taken => *taken = true,
                _ => return Err(MapError::DuplicateColumn(column.clone())),
            }
            descriptors.push(descriptor);
        }
        Ok(descriptors)
    }

    fn scan_record(&self, scanner: &mut dyn Scanner) -> Result<R, MapError> {
        let mut record = R::default();
        let columns = scanner.columns()?;
        let descriptors = self.bind(&columns)?;

        let translated = descriptors.iter().filter(|d| d.is_translated()).count();
        let mut translations = Translations::allocate(translated, &columns, &descriptors);

        {
            let mut slots: Vec<Option<&mut dyn ScanTarget>> =
                record.slots().into_iter().map(Some).collect();
            let mut holders = translations.holders_mut();
            let mut targets: Vec<&mut dyn ScanTarget> = Vec::with_capacity(columns.len());

            for (column, descriptor) in columns.iter().zip(&descriptors) {
                let target: Option<&mut dyn ScanTarget> = if descriptor.is_translated() {
                    holders.next()
                } else {
                    slots.get_mut(descriptor.slot).and_then(Option::take)
                };
                targets.push(target.ok_or_else(|| MapError::DuplicateColumn(column.clone()))?);
            }

            scanner.scan(&mut targets)?;
        }

        tracing::trace!(
            columns = columns.len(),
            translated = translations.len(),
            "row scanned"
        );
        translations.apply(&mut record)?;
        Ok(record)
    }
}

impl<R: Record> RowMapper for StructMapper<R> {
    type Output = Mapped<R>;

    fn map(&self, scanner: &mut dyn Scanner) -> Result<Mapped<R>, MapError> {
        let record = self.scan_record(scanner)?;
        Ok(Mapped::new(record, self.semantics))
    }
}
