//! The (field, operator, value) triple a caller asks for.

use std::fmt;

use crate::error::{FilterError, Result};
use crate::literal::{Literal, LiteralType};
use crate::op::Op;
use crate::schema::{resolve, Record};

/// A request to filter on `field <op> literal`.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateRequest {
    field: String,
    op: Op,
    literal: Literal,
}

impl PredicateRequest {
    pub fn new(field: impl Into<String>, op: impl Into<Op>, literal: impl Into<Literal>) -> Self {
        PredicateRequest {
            field: field.into(),
            op: op.into(),
            literal: literal.into(),
        }
    }

    /// Builds a request from an operator token such as `"GreaterThanOrEqual"`.
    pub fn parse(
        field: impl Into<String>,
        token: &str,
        literal: impl Into<Literal>,
    ) -> Result<Self> {
        Ok(PredicateRequest::new(field, token.parse::<Op>()?, literal))
    }

    /// Builds a request from untyped text, reading `text` according to the
    /// declared type of `field` on `R`.
    ///
    /// This is the entry point for values typed by a user: `"2000"` becomes a
    /// decimal for a decimal field and a string for a string field.
    pub fn from_text<R: Record>(field: &str, token: &str, text: &str) -> Result<Self> {
        let accessor = resolve(R::schema(), field)?;
        let op = token.parse::<Op>()?;
        let literal = Literal::parse(accessor.field_type(), text).map_err(|reason| {
            FilterError::LiteralConversion {
                field: field.to_string(),
                expected: accessor.field_type(),
                found: LiteralType::String,
                reason,
            }
        })?;
        Ok(PredicateRequest::new(field, op, literal))
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn literal(&self) -> &Literal {
        &self.literal
    }
}

impl fmt::Display for PredicateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.literal)
    }
}
