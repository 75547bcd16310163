//! Operator classification.
//!
//! Decides whether an operator may be applied to a field of a given type.
//!
//! | Type | Operators |
//! |------|-----------|
//! | int, decimal, date | all relational |
//! | string | all relational (ordinal), `Contains`, `StartsWith`, `EndsWith` |
//! | bool | `Equal`, `NotEqual` |

use crate::error::{FilterError, Result};
use crate::op::{Op, OperatorCategory};
use crate::value::FieldType;

/// An operator validated against a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperatorSpec {
    op: Op,
    category: OperatorCategory,
    field_type: FieldType,
}

impl OperatorSpec {
    pub fn op(&self) -> Op {
        self.op
    }

    pub fn category(&self) -> OperatorCategory {
        self.category
    }

    /// The field type this operator was validated for.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}

/// Returns `true` if `op` may be applied to a field of type `field_type`.
pub fn is_applicable(op: Op, field_type: FieldType) -> bool {
    let caps = field_type.capabilities();
    match op {
        Op::Relational(rel) if rel.is_ordering() => caps.supports_ordering,
        Op::Relational(_) => caps.supports_equality,
        Op::String(_) => caps.is_text,
    }
}

/// Validates `op` against the declared type of `field`.
///
/// `field` is only used for the error message.
pub fn classify(op: Op, field: &str, field_type: FieldType) -> Result<OperatorSpec> {
    if !is_applicable(op, field_type) {
        return Err(FilterError::UnsupportedOperator {
            op,
            field: field.to_string(),
            field_type,
        });
    }
    Ok(OperatorSpec {
        op,
        category: op.category(),
        field_type,
    })
}

/// Parses `token` and classifies it in one step.
pub fn classify_token(token: &str, field: &str, field_type: FieldType) -> Result<OperatorSpec> {
    classify(token.parse()?, field, field_type)
}
