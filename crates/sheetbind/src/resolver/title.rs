use crate::descriptor::FieldDescriptor;
use crate::discovery::discover;
use crate::error::ConfigError;
use crate::record::RecordType;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Column title → field, for exports that match columns by header label.
#[derive(Debug, Clone, Default)]
pub struct TitleBinding {
    columns: BTreeMap<String, Arc<FieldDescriptor>>,
}

impl TitleBinding {
    pub fn get(&self, title: &str) -> Option<&Arc<FieldDescriptor>> {
        self.columns.get(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.columns.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<FieldDescriptor>)> {
        self.columns.iter().map(|(title, field)| (title.as_str(), field))
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

pub(super) fn build_title_binding(record: &RecordType) -> Result<TitleBinding, ConfigError> {
    let annotated = discover(record).fields_with_column();
    // No positional fallback exists for titles.
    if annotated.is_empty() {
        return Err(ConfigError::NoColumnMetadata {
            record: record.name().to_string(),
        });
    }

    let mut columns = BTreeMap::new();
    for field in annotated {
        let Some(title) = field.column().and_then(|meta| meta.column_title()) else {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                record = record.name(),
                field = field.name(),
                "empty title; not bound"
            );
            continue;
        };
        if columns.contains_key(title) {
            #[cfg(feature = "tracing")]
            tracing::warn!(record = record.name(), title, "duplicate column title");
            return Err(ConfigError::DuplicateTitle {
                record: record.name().to_string(),
                title: title.to_string(),
            });
        }
        let title = title.to_string();
        columns.insert(title, field);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        record = record.name(),
        columns = columns.len(),
        "resolved title binding"
    );
    Ok(TitleBinding { columns })
}
