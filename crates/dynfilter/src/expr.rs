//! Abstract predicate expressions.
//!
//! An [`AbstractPredicate`] describes a test without being tied to any record:
//! either a binary comparison (`age < 19`) or a string method call
//! (`name.Contains("ahmed")`). It can be printed, inspected, and handed to
//! [`compile`](crate::compile) any number of times.

use std::fmt;

use crate::error::{FilterError, Result};
use crate::literal::Literal;
use crate::op::{Op, RelationalOp, StringOp};
use crate::registry::OperatorSpec;
use crate::schema::FieldAccessor;

/// A predicate over records of type `R`.
pub enum AbstractPredicate<R> {
    /// `field <op> literal`
    Compare {
        field: FieldAccessor<R>,
        op: RelationalOp,
        literal: Literal,
    },
    /// `field.method(argument)`
    Method {
        field: FieldAccessor<R>,
        method: StringOp,
        argument: String,
    },
}

/// The shape of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Comparison,
    MethodCall,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Comparison => f.write_str("comparison"),
            NodeKind::MethodCall => f.write_str("method call"),
        }
    }
}

impl<R> AbstractPredicate<R> {
    /// The field the predicate reads.
    pub fn field(&self) -> FieldAccessor<R> {
        match self {
            AbstractPredicate::Compare { field, .. } | AbstractPredicate::Method { field, .. } => {
                *field
            }
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            AbstractPredicate::Compare { .. } => NodeKind::Comparison,
            AbstractPredicate::Method { .. } => NodeKind::MethodCall,
        }
    }

    pub fn op(&self) -> Op {
        match self {
            AbstractPredicate::Compare { op, .. } => Op::Relational(*op),
            AbstractPredicate::Method { method, .. } => Op::String(*method),
        }
    }

    /// The right-hand side: the literal of a comparison or the argument of a
    /// method call.
    pub fn operand(&self) -> Literal {
        match self {
            AbstractPredicate::Compare { literal, .. } => literal.clone(),
            AbstractPredicate::Method { argument, .. } => Literal::String(argument.clone()),
        }
    }
}

impl<R> Clone for AbstractPredicate<R> {
    fn clone(&self) -> Self {
        match self {
            AbstractPredicate::Compare { field, op, literal } => AbstractPredicate::Compare {
                field: *field,
                op: *op,
                literal: literal.clone(),
            },
            AbstractPredicate::Method {
                field,
                method,
                argument,
            } => AbstractPredicate::Method {
                field: *field,
                method: *method,
                argument: argument.clone(),
            },
        }
    }
}

impl<R> fmt::Debug for AbstractPredicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractPredicate::Compare { field, op, literal } => f
                .debug_struct("Compare")
                .field("field", &field.name())
                .field("op", op)
                .field("literal", literal)
                .finish(),
            AbstractPredicate::Method {
                field,
                method,
                argument,
            } => f
                .debug_struct("Method")
                .field("field", &field.name())
                .field("method", method)
                .field("argument", argument)
                .finish(),
        }
    }
}

impl<R> fmt::Display for AbstractPredicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractPredicate::Compare { field, op, literal } => {
                write!(f, "{} {} {}", field.name(), op.symbol(), literal)
            }
            AbstractPredicate::Method {
                field,
                method,
                argument,
            } => write!(f, "{}.{}({:?})", field.name(), method, argument),
        }
    }
}

/// Builds the expression for `field <spec> literal`.
///
/// The literal is converted to the field's declared type first; conversion
/// failures are reported here and never reach the compiler.
pub fn build<R>(
    field: FieldAccessor<R>,
    spec: OperatorSpec,
    literal: impl Into<Literal>,
) -> Result<AbstractPredicate<R>> {
    let field_type = field.field_type();
    if spec.field_type() != field_type {
        return Err(FilterError::Compilation(format!(
            "operator {} was classified for {} but field '{}' is {}",
            spec.op(),
            spec.field_type(),
            field.name(),
            field_type
        )));
    }

    let literal = literal.into();
    let found = literal.literal_type();
    let literal = literal
        .coerce(field_type)
        .map_err(|reason| FilterError::LiteralConversion {
            field: field.name().to_string(),
            expected: field_type,
            found,
            reason,
        })?;

    match (spec.op(), literal) {
        (Op::Relational(op), literal) => Ok(AbstractPredicate::Compare { field, op, literal }),
        (Op::String(method), Literal::String(argument)) => Ok(AbstractPredicate::Method {
            field,
            method,
            argument,
        }),
        (Op::String(method), other) => Err(FilterError::Compilation(format!(
            "{} needs a string argument, got {}",
            method,
            other.literal_type()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionFailure;
    use crate::literal::LiteralType;
    use crate::registry::classify;
    use crate::value::{FieldType, Value};
    use rust_decimal::Decimal;

    struct Row {
        name: String,
        age: i32,
        spend: Decimal,
    }

    fn row_name(r: &Row) -> Value<'_> {
        Value::String(&r.name)
    }

    fn row_age(r: &Row) -> Value<'_> {
        Value::Int(r.age.into())
    }

    fn row_spend(r: &Row) -> Value<'_> {
        Value::Decimal(r.spend)
    }

    fn name() -> FieldAccessor<Row> {
        FieldAccessor::new("name", FieldType::String, row_name)
    }

    fn age() -> FieldAccessor<Row> {
        FieldAccessor::new("age", FieldType::Int, row_age)
    }

    fn spend() -> FieldAccessor<Row> {
        FieldAccessor::new("spendAverage", FieldType::Decimal, row_spend)
    }

    #[test]
    fn relational_builds_comparison() {
        let spec = classify(RelationalOp::LessThan.into(), "age", FieldType::Int).unwrap();
        let expr = build(age(), spec, 19).unwrap();
        assert_eq!(expr.kind(), NodeKind::Comparison);
        assert_eq!(expr.op(), Op::Relational(RelationalOp::LessThan));
        assert_eq!(expr.operand(), Literal::Int(19));
        assert_eq!(expr.to_string(), "age < 19");
    }

    #[test]
    fn string_op_builds_method_call() {
        let spec = classify(StringOp::Contains.into(), "name", FieldType::String).unwrap();
        let expr = build(name(), spec, "ahmed").unwrap();
        assert_eq!(expr.kind(), NodeKind::MethodCall);
        assert_eq!(expr.field().name(), "name");
        assert_eq!(expr.to_string(), "name.Contains(\"ahmed\")");
    }

    #[test]
    fn int_literal_widens_for_decimal_field() {
        let spec = classify(
            RelationalOp::GreaterThanOrEqual.into(),
            "spendAverage",
            FieldType::Decimal,
        )
        .unwrap();
        let expr = build(spend(), spec, 2000).unwrap();
        assert_eq!(expr.operand(), Literal::Decimal(Decimal::from(2000)));
        assert_eq!(expr.to_string(), "spendAverage >= 2000");
    }

    #[test]
    fn mismatched_literal_is_rejected() {
        let spec = classify(RelationalOp::Equal.into(), "age", FieldType::Int).unwrap();
        let err = build(age(), spec, "nineteen").unwrap_err();
        assert_eq!(
            err,
            FilterError::LiteralConversion {
                field: "age".into(),
                expected: FieldType::Int,
                found: LiteralType::String,
                reason: ConversionFailure::KindMismatch,
            }
        );
    }

    #[test]
    fn spec_for_other_type_is_rejected() {
        let spec = classify(StringOp::StartsWith.into(), "name", FieldType::String).unwrap();
        assert!(matches!(
            build(age(), spec, "m"),
            Err(FilterError::Compilation(_))
        ));
    }

    #[test]
    fn expression_is_reusable() {
        let spec = classify(RelationalOp::NotEqual.into(), "age", FieldType::Int).unwrap();
        let expr = build(age(), spec, 30).unwrap();
        let copy = expr.clone();
        assert_eq!(copy.to_string(), expr.to_string());
        assert_eq!(format!("{:?}", expr), format!("{:?}", copy));
    }

    #[test]
    fn accessor_reads_row() {
        let row = Row {
            name: "ahmed".into(),
            age: 18,
            spend: Decimal::from(10),
        };
        assert_eq!(age().get(&row), Value::Int(18));
        assert_eq!(name().get(&row), Value::String("ahmed"));
    }
}
