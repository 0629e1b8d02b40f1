use crate::descriptor::FieldDescriptor;
use crate::discovery::discover;
use crate::error::ConfigError;
use crate::record::RecordType;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

/// Column position → field, for exports that write columns by position.
#[derive(Debug, Clone, Default)]
pub struct IndexBinding {
    columns: BTreeMap<u32, Arc<FieldDescriptor>>,
}

impl IndexBinding {
    pub fn get(&self, index: u32) -> Option<&Arc<FieldDescriptor>> {
        self.columns.get(&index)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Entries in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Arc<FieldDescriptor>)> {
        self.columns.iter().map(|(index, field)| (*index, field))
    }

    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.columns.keys().copied()
    }
}

pub(super) fn build_index_binding(record: &RecordType) -> Result<IndexBinding, ConfigError> {
    let container = discover(record);
    let annotated = container.fields_with_column();

    if annotated.is_empty() {
        let columns: BTreeMap<u32, Arc<FieldDescriptor>> =
            (0u32..).zip(container.fields()).collect();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            record = record.name(),
            columns = columns.len(),
            "no column metadata; binding every field by position"
        );
        return Ok(IndexBinding { columns });
    }

    let mut columns = BTreeMap::new();
    for field in annotated {
        let Some(index) = field.column().and_then(|meta| meta.column_index()) else {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                record = record.name(),
                field = field.name(),
                "negative index; not bound"
            );
            continue;
        };
        match columns.entry(index) {
            Entry::Occupied(_) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(record = record.name(), index, "duplicate column index");
                return Err(ConfigError::DuplicateIndex {
                    record: record.name().to_string(),
                    index,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(field);
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        record = record.name(),
        columns = columns.len(),
        "resolved index binding"
    );
    Ok(IndexBinding { columns })
}
