use crate::descriptor::FieldDescriptor;
use crate::error::AccessError;
use sheetbind_common::CellValue;
use std::any::Any;

/// Read one field of one record.
///
/// A missing instance or descriptor yields `Ok(None)`. An error means the
/// descriptor does not belong to the instance's type, or its read failed.
pub fn get_value(
    instance: Option<&dyn Any>,
    field: Option<&FieldDescriptor>,
) -> Result<Option<CellValue>, AccessError> {
    match (instance, field) {
        (Some(instance), Some(field)) => field.read(instance).map(Some),
        _ => Ok(None),
    }
}
