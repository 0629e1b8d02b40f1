use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Declared kind of a record field's value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ValueKind {
    Integer,
    Number,
    Boolean,
    Text,
    Date,
    DateTime,
    Time,
    /// Anything the export pipeline has to format on its own.
    Other,
}

impl ValueKind {
    pub fn is_number(self) -> bool {
        matches!(self, Self::Integer | Self::Number)
    }

    pub fn is_bool(self) -> bool {
        matches!(self, Self::Boolean)
    }

    /// Calendar values. A bare time of day is not a date.
    pub fn is_date(self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Time => "time",
            Self::Other => "other",
        })
    }
}
