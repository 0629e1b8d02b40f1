use crate::descriptor::FieldDescriptor;
use std::cmp::Ordering;
use std::sync::Arc;

const DEFAULT_ORDER: i32 = 0;

/// Compare two fields by declared `order`.
///
/// A field without column metadata counts as order `0`; two such fields are
/// equal. Ties are not broken here.
pub fn compare_fields(a: &FieldDescriptor, b: &FieldDescriptor) -> Ordering {
    if a.column().is_none() && b.column().is_none() {
        return Ordering::Equal;
    }
    let order_a = a.column().map_or(DEFAULT_ORDER, |meta| meta.order);
    let order_b = b.column().map_or(DEFAULT_ORDER, |meta| meta.order);
    order_a.cmp(&order_b)
}

/// Stable sort by [`compare_fields`]; equal fields keep their discovery order.
pub fn sort_fields(fields: &mut [Arc<FieldDescriptor>]) {
    fields.sort_by(|a, b| compare_fields(a, b));
}
