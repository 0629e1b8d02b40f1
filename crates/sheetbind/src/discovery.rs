//! Field discovery across a record's parent chain.

use crate::descriptor::{FieldDescriptor, Projection};
use crate::record::RecordType;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Fields declared at one level of a record's parent chain.
#[derive(Debug)]
pub struct FieldContainer {
    record: Arc<str>,
    declared: Vec<Arc<FieldDescriptor>>,
    by_name: FxHashMap<String, Arc<FieldDescriptor>>,
    parent: Option<Box<FieldContainer>>,
}

impl FieldContainer {
    /// Name of the record level this container describes.
    pub fn record_name(&self) -> &str {
        &self.record
    }

    /// Fields declared directly at this level, in declaration order.
    pub fn declared_fields(&self) -> &[Arc<FieldDescriptor>] {
        &self.declared
    }

    /// Lookup restricted to this level.
    pub fn field(&self, name: &str) -> Option<&Arc<FieldDescriptor>> {
        self.by_name.get(name)
    }

    /// Lookup along the chain. A name declared at several levels resolves to
    /// the most-derived one.
    pub fn find(&self, name: &str) -> Option<&Arc<FieldDescriptor>> {
        self.levels().find_map(|level| level.field(name))
    }

    pub fn parent(&self) -> Option<&FieldContainer> {
        self.parent.as_deref()
    }

    /// This level followed by each ancestor level.
    pub fn levels(&self) -> impl Iterator<Item = &FieldContainer> {
        std::iter::successors(Some(self), |level| level.parent())
    }

    pub fn depth(&self) -> usize {
        self.levels().count()
    }

    /// Every field of every level: this level first, then each ancestor.
    pub fn fields(&self) -> Vec<Arc<FieldDescriptor>> {
        self.levels()
            .flat_map(|level| level.declared.iter().cloned())
            .collect()
    }

    /// Flattened fields that carry column metadata, in the order of [`fields`](Self::fields).
    pub fn fields_with_column(&self) -> Vec<Arc<FieldDescriptor>> {
        self.levels()
            .flat_map(|level| level.declared.iter())
            .filter(|field| field.has_column())
            .cloned()
            .collect()
    }
}

/// Walk `record` and its parents, one container per level.
///
/// Every descriptor returned reads from an instance of `record` itself:
/// ancestor fields are reached through the chain of parent projections.
pub fn discover(record: &RecordType) -> FieldContainer {
    discover_level(record, &[], record.rust_type())
}

fn discover_level(
    record: &RecordType,
    path: &[Arc<Projection>],
    outer: &'static str,
) -> FieldContainer {
    let mut declared = Vec::with_capacity(record.declared_fields().len());
    let mut by_name = FxHashMap::default();
    for field in record.declared_fields() {
        let field = Arc::new(rebase(field, path, outer));
        by_name.insert(field.name().to_string(), Arc::clone(&field));
        declared.push(field);
    }

    let parent = record.parent_link().map(|link| {
        let mut parent_path = Vec::with_capacity(path.len() + 1);
        parent_path.extend(path.iter().cloned());
        parent_path.push(Arc::clone(&link.project));
        Box::new(discover_level(&link.record, &parent_path, outer))
    });

    FieldContainer {
        record: Arc::from(record.name()),
        declared,
        by_name,
        parent,
    }
}

/// `path` runs from the discovered record down to the level declaring `field`.
fn rebase(
    field: &FieldDescriptor,
    path: &[Arc<Projection>],
    outer: &'static str,
) -> FieldDescriptor {
    if path.is_empty() {
        return field.clone();
    }
    let path: Vec<Arc<Projection>> = path.to_vec();
    let project = crate::descriptor::projection(move |any| {
        path.iter().try_fold(any, |current, step| step(current))
    });
    field.with_accessor(field.accessor().through(project, outer))
}
