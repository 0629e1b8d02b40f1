//! Field descriptors and the accessor capability bound to each of them.

use crate::error::AccessError;
use crate::meta::ColumnMeta;
use sheetbind_common::{CellValue, ValueKind};
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

enum ReadFailure {
    Mismatch,
    Failed(String),
}

type ReadFn = dyn Fn(&dyn Any) -> Result<CellValue, ReadFailure> + Send + Sync;

/// Maps an instance of a derived record onto the parent record it embeds.
pub(crate) type Projection = dyn Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync;

pub(crate) fn projection<F>(f: F) -> Arc<Projection>
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Reads one field out of a type-erased record instance.
///
/// The capability is granted when the field is registered, so it can reach
/// state the record type does not otherwise expose.
#[derive(Clone)]
pub struct Accessor {
    read: Arc<ReadFn>,
    expected: &'static str,
}

impl Accessor {
    pub fn new<T, F>(read: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(move |any: &dyn Any| {
                any.downcast_ref::<T>()
                    .map(|record| read(record))
                    .ok_or(ReadFailure::Mismatch)
            }),
            expected: type_name::<T>(),
        }
    }

    pub fn fallible<T, F, E>(read: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Result<CellValue, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self {
            read: Arc::new(move |any: &dyn Any| match any.downcast_ref::<T>() {
                Some(record) => read(record).map_err(|e| ReadFailure::Failed(e.to_string())),
                None => Err(ReadFailure::Mismatch),
            }),
            expected: type_name::<T>(),
        }
    }

    /// Accessor for the same field reached from an instance of `outer`.
    pub(crate) fn through(&self, project: Arc<Projection>, outer: &'static str) -> Self {
        let inner = Arc::clone(&self.read);
        Self {
            read: Arc::new(move |any: &dyn Any| match project(any) {
                Some(embedded) => inner(embedded),
                None => Err(ReadFailure::Mismatch),
            }),
            expected: outer,
        }
    }

    /// Rust type name of the instance this accessor reads from.
    pub fn expected_type(&self) -> &'static str {
        self.expected
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}

/// One declared field of one record level.
///
/// Two levels declaring the same name produce two descriptors; they are
/// never merged.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    declared_in: Arc<str>,
    kind: ValueKind,
    column: Option<ColumnMeta>,
    accessor: Accessor,
}

impl FieldDescriptor {
    pub(crate) fn new(
        name: String,
        declared_in: Arc<str>,
        kind: ValueKind,
        column: Option<ColumnMeta>,
        accessor: Accessor,
    ) -> Self {
        Self {
            name,
            declared_in,
            kind,
            column,
            accessor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the record level that declares this field.
    pub fn declared_in(&self) -> &str {
        &self.declared_in
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn column(&self) -> Option<&ColumnMeta> {
        self.column.as_ref()
    }

    pub fn has_column(&self) -> bool {
        self.column.is_some()
    }

    pub fn accessor(&self) -> &Accessor {
        &self.accessor
    }

    /// Read this field from `instance`.
    pub fn read(&self, instance: &dyn Any) -> Result<CellValue, AccessError> {
        (self.accessor.read)(instance).map_err(|failure| match failure {
            ReadFailure::Mismatch => AccessError::TypeMismatch {
                field: self.name.clone(),
                expected: self.accessor.expected,
            },
            ReadFailure::Failed(message) => AccessError::ReadFailed {
                field: self.name.clone(),
                message,
            },
        })
    }

    pub(crate) fn with_accessor(&self, accessor: Accessor) -> Self {
        Self {
            accessor,
            ..self.clone()
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("declared_in", &self.declared_in)
            .field("kind", &self.kind)
            .field("column", &self.column)
            .finish()
    }
}
