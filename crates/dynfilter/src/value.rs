//! Field types and the run-time values read from records.
//!
//! A [`FieldType`] is what a schema declares for a field; a [`Value`] is what
//! an accessor returns for one record. Values borrow from the record, so
//! reading a string field never allocates.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// The declared type of a queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Signed integer (any integer field that widens losslessly to `i64`).
    Int,
    /// Fixed-point decimal.
    Decimal,
    /// UTF-8 text.
    String,
    /// Boolean flag.
    Bool,
    /// Calendar date.
    Date,
}

/// Operator families a field type admits.
///
/// The operator registry consults this table instead of matching on
/// individual types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTypeCapabilities {
    pub supports_equality: bool,
    pub supports_ordering: bool,
    pub is_text: bool,
}

impl FieldType {
    /// All field types, in declaration order.
    pub const ALL: [FieldType; 5] = [
        FieldType::Int,
        FieldType::Decimal,
        FieldType::String,
        FieldType::Bool,
        FieldType::Date,
    ];

    /// Returns the operator capabilities of this type.
    pub const fn capabilities(self) -> FieldTypeCapabilities {
        match self {
            FieldType::Int | FieldType::Decimal | FieldType::Date => FieldTypeCapabilities {
                supports_equality: true,
                supports_ordering: true,
                is_text: false,
            },
            FieldType::String => FieldTypeCapabilities {
                supports_equality: true,
                supports_ordering: true,
                is_text: true,
            },
            FieldType::Bool => FieldTypeCapabilities {
                supports_equality: true,
                supports_ordering: false,
                is_text: false,
            },
        }
    }

    /// Returns the display name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::Decimal => "decimal",
            FieldType::String => "string",
            FieldType::Bool => "bool",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field value extracted from a record.
///
/// Values are borrowed where possible to avoid allocation during filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Integer value.
    Int(i64),
    /// Decimal value.
    Decimal(Decimal),
    /// Borrowed string.
    String(&'a str),
    /// Boolean value.
    Bool(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Optional field with no value on this record. Never matches.
    Null,
}

impl<'a> Value<'a> {
    /// Returns the field type this value carries, or `None` for [`Value::Null`].
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Value::Int(_) => Some(FieldType::Int),
            Value::Decimal(_) => Some(FieldType::Decimal),
            Value::String(_) => Some(FieldType::String),
            Value::Bool(_) => Some(FieldType::Bool),
            Value::Date(_) => Some(FieldType::Date),
            Value::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Compares two values of the same type.
    ///
    /// Strings compare ordinally (byte order). Returns `None` when the types
    /// differ or either side is [`Value::Null`].
    pub fn compare(&self, other: &Value<'_>) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Null => f.write_str("null"),
        }
    }
}
