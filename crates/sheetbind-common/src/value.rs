use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

use crate::ValueKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A value read out of one record field, ready to be written into a cell.
///
/// This is what an export pipeline receives per field per record. Formatting
/// and coercion into a concrete sheet format happen downstream.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Empty, // `None` fields and absent values
}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            CellValue::Int(i) => i.hash(state),
            CellValue::Number(n) => n.to_bits().hash(state),
            CellValue::Text(s) => s.hash(state),
            CellValue::Boolean(b) => b.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::DateTime(dt) => dt.hash(state),
            CellValue::Time(t) => t.hash(state),
            CellValue::Empty => state.write_u8(0),
        }
    }
}

impl Eq for CellValue {}

impl Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Boolean(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::DateTime(dt) => write!(f, "{dt}"),
            CellValue::Time(t) => write!(f, "{t}"),
            CellValue::Empty => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Kind of the produced value. `Empty` reports [`ValueKind::Other`].
    pub fn kind(&self) -> ValueKind {
        match self {
            CellValue::Int(_) => ValueKind::Integer,
            CellValue::Number(_) => ValueKind::Number,
            CellValue::Text(_) => ValueKind::Text,
            CellValue::Boolean(_) => ValueKind::Boolean,
            CellValue::Date(_) => ValueKind::Date,
            CellValue::DateTime(_) => ValueKind::DateTime,
            CellValue::Time(_) => ValueKind::Time,
            CellValue::Empty => ValueKind::Other,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// Conversion from a field's Rust type into a [`CellValue`].
///
/// `KIND` is the declared kind of the field, known without an instance.
pub trait ToCellValue {
    const KIND: ValueKind;

    fn to_cell_value(&self) -> CellValue;
}

macro_rules! int_cell {
    ($($t:ty),*) => {$(
        impl ToCellValue for $t {
            const KIND: ValueKind = ValueKind::Integer;
            fn to_cell_value(&self) -> CellValue {
                CellValue::Int(i64::from(*self))
            }
        }
    )*};
}

int_cell!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! wide_int_cell {
    ($($t:ty),*) => {$(
        impl ToCellValue for $t {
            const KIND: ValueKind = ValueKind::Integer;
            fn to_cell_value(&self) -> CellValue {
                // Out-of-range values keep their magnitude as a float.
                match i64::try_from(*self) {
                    Ok(i) => CellValue::Int(i),
                    Err(_) => CellValue::Number(*self as f64),
                }
            }
        }
    )*};
}

wide_int_cell!(u64, usize, isize, i128, u128);

impl ToCellValue for f32 {
    const KIND: ValueKind = ValueKind::Number;
    fn to_cell_value(&self) -> CellValue {
        CellValue::Number(f64::from(*self))
    }
}

impl ToCellValue for f64 {
    const KIND: ValueKind = ValueKind::Number;
    fn to_cell_value(&self) -> CellValue {
        CellValue::Number(*self)
    }
}

impl ToCellValue for bool {
    const KIND: ValueKind = ValueKind::Boolean;
    fn to_cell_value(&self) -> CellValue {
        CellValue::Boolean(*self)
    }
}

impl ToCellValue for char {
    const KIND: ValueKind = ValueKind::Text;
    fn to_cell_value(&self) -> CellValue {
        CellValue::Text(self.to_string())
    }
}

impl ToCellValue for String {
    const KIND: ValueKind = ValueKind::Text;
    fn to_cell_value(&self) -> CellValue {
        CellValue::Text(self.clone())
    }
}

impl ToCellValue for &'static str {
    const KIND: ValueKind = ValueKind::Text;
    fn to_cell_value(&self) -> CellValue {
        CellValue::Text((*self).to_string())
    }
}

impl ToCellValue for NaiveDate {
    const KIND: ValueKind = ValueKind::Date;
    fn to_cell_value(&self) -> CellValue {
        CellValue::Date(*self)
    }
}

impl ToCellValue for NaiveDateTime {
    const KIND: ValueKind = ValueKind::DateTime;
    fn to_cell_value(&self) -> CellValue {
        CellValue::DateTime(*self)
    }
}

impl ToCellValue for NaiveTime {
    const KIND: ValueKind = ValueKind::Time;
    fn to_cell_value(&self) -> CellValue {
        CellValue::Time(*self)
    }
}

impl<T: ToCellValue> ToCellValue for Option<T> {
    const KIND: ValueKind = T::KIND;
    fn to_cell_value(&self) -> CellValue {
        match self {
            Some(v) => v.to_cell_value(),
            None => CellValue::Empty,
        }
    }
}

impl ToCellValue for CellValue {
    const KIND: ValueKind = ValueKind::Other;
    fn to_cell_value(&self) -> CellValue {
        self.clone()
    }
}
