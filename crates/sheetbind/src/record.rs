//! Registered record types.
//!
//! A [`RecordType`] is the static description of one exportable Rust type:
//! the fields it declares directly, the column metadata attached to them, and
//! an optional link to the parent record it embeds. Types are built once
//! (by hand through [`RecordTypeBuilder`] or by `#[derive(ExcelRecord)]`) and
//! shared as `Arc<RecordType>`. The allocation is the type's identity.

use crate::descriptor::{Accessor, FieldDescriptor, Projection, projection};
use crate::error::{AccessError, ConfigError};
use crate::meta::ColumnMeta;
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use sheetbind_common::{CellValue, ToCellValue, ValueKind};
use std::any::{Any, type_name};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type Constructor = dyn Fn() -> Box<dyn Any + Send> + Send + Sync;

/// Whether a type's fields are known statically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordShape {
    /// Fields are declared once for every instance.
    Struct,
    /// Keys are decided per instance (maps); nothing to resolve.
    Dynamic,
}

pub(crate) struct ParentLink {
    pub(crate) record: Arc<RecordType>,
    pub(crate) project: Arc<Projection>,
}

pub struct RecordType {
    name: Arc<str>,
    rust_type: &'static str,
    shape: RecordShape,
    fields: Vec<FieldDescriptor>,
    parent: Option<ParentLink>,
    constructor: Option<Arc<Constructor>>,
}

impl RecordType {
    pub fn builder<T: Any>(name: impl Into<Arc<str>>) -> RecordTypeBuilder<T> {
        RecordTypeBuilder::new(name.into())
    }

    /// A record whose keys vary per instance.
    pub fn dynamic(name: impl Into<Arc<str>>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            rust_type: "<dynamic>",
            shape: RecordShape::Dynamic,
            fields: Vec::new(),
            parent: None,
            constructor: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rust type name the registered accessors read from.
    pub fn rust_type(&self) -> &'static str {
        self.rust_type
    }

    pub fn shape(&self) -> RecordShape {
        self.shape
    }

    pub fn is_dynamic(&self) -> bool {
        self.shape == RecordShape::Dynamic
    }

    /// Fields declared directly at this level, in declaration order.
    pub fn declared_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn parent(&self) -> Option<&Arc<RecordType>> {
        self.parent.as_ref().map(|link| &link.record)
    }

    pub(crate) fn parent_link(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    pub fn is_instantiable(&self) -> bool {
        self.constructor.is_some()
    }

    /// Build a fresh instance through the registered constructor.
    pub fn new_instance(&self) -> Result<Box<dyn Any + Send>, AccessError> {
        match &self.constructor {
            Some(construct) => Ok(construct()),
            None => Err(AccessError::NotInstantiable {
                record: self.name.to_string(),
            }),
        }
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("fields", &self.fields)
            .field("parent", &self.parent().map(|p| p.name()))
            .finish()
    }
}

/// Registers the fields of `T` one level at a time.
pub struct RecordTypeBuilder<T> {
    name: Arc<str>,
    fields: Vec<FieldDescriptor>,
    parent: Option<ParentLink>,
    constructor: Option<Arc<Constructor>>,
    _record: PhantomData<fn(&T)>,
}

impl<T: Any> RecordTypeBuilder<T> {
    fn new(name: Arc<str>) -> Self {
        Self {
            name,
            fields: Vec::new(),
            parent: None,
            constructor: None,
            _record: PhantomData,
        }
    }

    /// Field carrying column metadata.
    pub fn column<V, F>(self, name: impl Into<String>, meta: ColumnMeta, getter: F) -> Self
    where
        V: ToCellValue + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        self.field_with(name, V::KIND, Some(meta), move |record: &T| {
            getter(record).to_cell_value()
        })
    }

    /// Field without column metadata.
    pub fn plain<V, F>(self, name: impl Into<String>, getter: F) -> Self
    where
        V: ToCellValue + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        self.field_with(name, V::KIND, None, move |record: &T| {
            getter(record).to_cell_value()
        })
    }

    /// Field whose value is computed from the record.
    pub fn field_with<F>(
        mut self,
        name: impl Into<String>,
        kind: ValueKind,
        meta: Option<ColumnMeta>,
        read: F,
    ) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        self.fields.push(FieldDescriptor::new(
            name.into(),
            Arc::clone(&self.name),
            kind,
            meta,
            Accessor::new(read),
        ));
        self
    }

    /// Field whose read can fail; failures surface as
    /// [`AccessError::ReadFailed`].
    pub fn try_field<F, E>(
        mut self,
        name: impl Into<String>,
        kind: ValueKind,
        meta: Option<ColumnMeta>,
        read: F,
    ) -> Self
    where
        F: Fn(&T) -> Result<CellValue, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        self.fields.push(FieldDescriptor::new(
            name.into(),
            Arc::clone(&self.name),
            kind,
            meta,
            Accessor::fallible(read),
        ));
        self
    }

    /// Declare the parent record `T` embeds. Its fields form the next level
    /// of discovery.
    pub fn extends<P, F>(mut self, parent: Arc<RecordType>, project: F) -> Self
    where
        P: Any,
        F: Fn(&T) -> &P + Send + Sync + 'static,
    {
        self.parent = Some(ParentLink {
            record: parent,
            project: projection(move |any: &dyn Any| {
                any.downcast_ref::<T>().map(|record| project(record) as &dyn Any)
            }),
        });
        self
    }

    pub fn constructor<F>(mut self, construct: F) -> Self
    where
        T: Send,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(move || Box::new(construct()) as Box<dyn Any + Send>));
        self
    }

    pub fn build(self) -> Result<Arc<RecordType>, ConfigError> {
        let mut seen = FxHashSet::default();
        for field in &self.fields {
            if !seen.insert(field.name()) {
                return Err(ConfigError::DuplicateField {
                    record: self.name.to_string(),
                    field: field.name().to_string(),
                });
            }
        }
        Ok(Arc::new(RecordType {
            name: self.name,
            rust_type: type_name::<T>(),
            shape: RecordShape::Struct,
            fields: self.fields,
            parent: self.parent,
            constructor: self.constructor,
        }))
    }
}

/// A Rust type with a registered [`RecordType`].
///
/// Usually implemented with `#[derive(ExcelRecord)]`.
pub trait ExcelRecord: Any {
    fn record_type() -> Arc<RecordType>;
}

static MAP_RECORD: Lazy<Arc<RecordType>> = Lazy::new(|| RecordType::dynamic("map"));

fn map_record() -> Arc<RecordType> {
    Arc::clone(&MAP_RECORD)
}

impl<K: 'static, V: 'static, S: 'static> ExcelRecord for HashMap<K, V, S> {
    fn record_type() -> Arc<RecordType> {
        map_record()
    }
}

impl<K: 'static, V: 'static> ExcelRecord for BTreeMap<K, V> {
    fn record_type() -> Arc<RecordType> {
        map_record()
    }
}
