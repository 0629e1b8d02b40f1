use crate::descriptor::FieldDescriptor;
use crate::meta::GroupTag;

/// Whether `field` belongs to an export restricted to `requested` groups.
///
/// An empty request disables filtering. Otherwise a field is only selected
/// when it declares at least one of the requested groups; fields without
/// metadata or without groups never are.
pub fn is_included(requested: &[GroupTag], field: &FieldDescriptor) -> bool {
    if requested.is_empty() {
        return true;
    }
    let Some(meta) = field.column() else {
        return false;
    };
    meta.groups.iter().any(|tag| requested.contains(tag))
}
