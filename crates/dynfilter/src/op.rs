//! Operator tokens and their evaluation.
//!
//! Operators come in two families:
//! - **Relational**: `Equal`, `NotEqual`, `LessThan`, `LessThanOrEqual`,
//!   `GreaterThan`, `GreaterThanOrEqual`
//! - **String predicates**: `Contains`, `StartsWith`, `EndsWith`
//!
//! Tokens are matched case-sensitively. `LessOrEqual` and `GreaterOrEqual`
//! are accepted as alternative spellings of the two inclusive comparisons.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::FilterError;

/// A binary comparison between a field value and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationalOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

/// A string method applied to the field value with the literal as argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringOp {
    Contains,
    StartsWith,
    EndsWith,
}

/// Any supported operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Relational(RelationalOp),
    String(StringOp),
}

/// The family an operator belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    /// Binary comparison node: `field <op> literal`.
    Relational,
    /// Method-call node: `field.method(literal)`.
    StringPredicate,
}

impl RelationalOp {
    pub const ALL: [RelationalOp; 6] = [
        RelationalOp::Equal,
        RelationalOp::NotEqual,
        RelationalOp::LessThan,
        RelationalOp::LessThanOrEqual,
        RelationalOp::GreaterThan,
        RelationalOp::GreaterThanOrEqual,
    ];

    /// Returns `true` for the four ordering comparisons.
    pub fn is_ordering(self) -> bool {
        !matches!(self, RelationalOp::Equal | RelationalOp::NotEqual)
    }

    /// Evaluates the comparison given `field.cmp(literal)`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            RelationalOp::Equal => ordering == Ordering::Equal,
            RelationalOp::NotEqual => ordering != Ordering::Equal,
            RelationalOp::LessThan => ordering == Ordering::Less,
            RelationalOp::LessThanOrEqual => ordering != Ordering::Greater,
            RelationalOp::GreaterThan => ordering == Ordering::Greater,
            RelationalOp::GreaterThanOrEqual => ordering != Ordering::Less,
        }
    }

    /// The operator that is true exactly when this one is false.
    pub fn complement(self) -> RelationalOp {
        match self {
            RelationalOp::Equal => RelationalOp::NotEqual,
            RelationalOp::NotEqual => RelationalOp::Equal,
            RelationalOp::LessThan => RelationalOp::GreaterThanOrEqual,
            RelationalOp::LessThanOrEqual => RelationalOp::GreaterThan,
            RelationalOp::GreaterThan => RelationalOp::LessThanOrEqual,
            RelationalOp::GreaterThanOrEqual => RelationalOp::LessThan,
        }
    }

    /// Infix symbol used when printing expressions.
    pub fn symbol(self) -> &'static str {
        match self {
            RelationalOp::Equal => "==",
            RelationalOp::NotEqual => "!=",
            RelationalOp::LessThan => "<",
            RelationalOp::LessThanOrEqual => "<=",
            RelationalOp::GreaterThan => ">",
            RelationalOp::GreaterThanOrEqual => ">=",
        }
    }

    /// Canonical token.
    pub fn as_str(self) -> &'static str {
        match self {
            RelationalOp::Equal => "Equal",
            RelationalOp::NotEqual => "NotEqual",
            RelationalOp::LessThan => "LessThan",
            RelationalOp::LessThanOrEqual => "LessThanOrEqual",
            RelationalOp::GreaterThan => "GreaterThan",
            RelationalOp::GreaterThanOrEqual => "GreaterThanOrEqual",
        }
    }
}

impl StringOp {
    pub const ALL: [StringOp; 3] = [StringOp::Contains, StringOp::StartsWith, StringOp::EndsWith];

    /// Applies the method to `haystack` with `needle` as argument.
    ///
    /// Matching is exact and case-sensitive.
    pub fn eval(self, haystack: &str, needle: &str) -> bool {
        match self {
            StringOp::Contains => haystack.contains(needle),
            StringOp::StartsWith => haystack.starts_with(needle),
            StringOp::EndsWith => haystack.ends_with(needle),
        }
    }

    /// Canonical token, also used as the method name when printing.
    pub fn as_str(self) -> &'static str {
        match self {
            StringOp::Contains => "Contains",
            StringOp::StartsWith => "StartsWith",
            StringOp::EndsWith => "EndsWith",
        }
    }
}

impl Op {
    /// Returns the family this operator belongs to.
    pub fn category(self) -> OperatorCategory {
        match self {
            Op::Relational(_) => OperatorCategory::Relational,
            Op::String(_) => OperatorCategory::StringPredicate,
        }
    }

    /// Canonical token of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Relational(op) => op.as_str(),
            Op::String(op) => op.as_str(),
        }
    }

    /// Parses a token, accepting the documented aliases.
    pub fn parse_token(token: &str) -> Option<Op> {
        let op = match token {
            "Equal" => Op::Relational(RelationalOp::Equal),
            "NotEqual" => Op::Relational(RelationalOp::NotEqual),
            "LessThan" => Op::Relational(RelationalOp::LessThan),
            "LessThanOrEqual" | "LessOrEqual" => Op::Relational(RelationalOp::LessThanOrEqual),
            "GreaterThan" => Op::Relational(RelationalOp::GreaterThan),
            "GreaterThanOrEqual" | "GreaterOrEqual" => {
                Op::Relational(RelationalOp::GreaterThanOrEqual)
            }
            "Contains" => Op::String(StringOp::Contains),
            "StartsWith" => Op::String(StringOp::StartsWith),
            "EndsWith" => Op::String(StringOp::EndsWith),
            _ => return None,
        };
        Some(op)
    }
}

impl FromStr for Op {
    type Err = FilterError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Op::parse_token(token).ok_or_else(|| FilterError::UnknownOperator {
            token: token.to_string(),
        })
    }
}

impl From<RelationalOp> for Op {
    fn from(op: RelationalOp) -> Self {
        Op::Relational(op)
    }
}

impl From<StringOp> for Op {
    fn from(op: StringOp) -> Self {
        Op::String(op)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RelationalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StringOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
