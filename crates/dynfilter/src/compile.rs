//! Compilation of abstract predicates into callable tests.
//!
//! [`compile`] specialises an [`AbstractPredicate`] into a closure once, so
//! evaluating a record is a field read plus one comparison: no expression is
//! walked and no literal is converted per record.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error};

use crate::error::{FilterError, Result};
use crate::expr::AbstractPredicate;
use crate::literal::Literal;
use crate::op::RelationalOp;
use crate::registry::is_applicable;
use crate::schema::Extractor;
use crate::value::Value;

type TestFn<R> = dyn Fn(&R) -> bool + Send + Sync;

/// A reusable boolean test over records of type `R`.
///
/// Cloning is cheap and the predicate can be shared across threads.
pub struct CompiledPredicate<R> {
    test: Arc<TestFn<R>>,
    description: Arc<str>,
}

impl<R> CompiledPredicate<R> {
    /// Wraps an arbitrary test function.
    pub fn from_fn<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        CompiledPredicate {
            test: Arc::new(test),
            description: Arc::from(description.into()),
        }
    }

    /// Evaluates the predicate against one record.
    pub fn matches(&self, record: &R) -> bool {
        (self.test)(record)
    }

    /// Human-readable form of the expression this predicate was compiled from.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<R: 'static> CompiledPredicate<R> {
    /// Predicate that is true exactly when `self` is false.
    pub fn negate(&self) -> Self {
        let inner = Arc::clone(&self.test);
        CompiledPredicate {
            test: Arc::new(move |r: &R| !inner(r)),
            description: Arc::from(format!("!({})", self.description)),
        }
    }

    /// Predicate that is true when both `self` and `other` are.
    pub fn and(&self, other: &Self) -> Self {
        let (a, b) = (Arc::clone(&self.test), Arc::clone(&other.test));
        CompiledPredicate {
            test: Arc::new(move |r: &R| a(r) && b(r)),
            description: Arc::from(format!("({}) && ({})", self.description, other.description)),
        }
    }

    /// Predicate that is true when either `self` or `other` is.
    pub fn or(&self, other: &Self) -> Self {
        let (a, b) = (Arc::clone(&self.test), Arc::clone(&other.test));
        CompiledPredicate {
            test: Arc::new(move |r: &R| a(r) || b(r)),
            description: Arc::from(format!("({}) || ({})", self.description, other.description)),
        }
    }
}

impl<R> Clone for CompiledPredicate<R> {
    fn clone(&self) -> Self {
        CompiledPredicate {
            test: Arc::clone(&self.test),
            description: Arc::clone(&self.description),
        }
    }
}

impl<R> fmt::Debug for CompiledPredicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledPredicate")
            .field(&self.description)
            .finish()
    }
}

impl<R> fmt::Display for CompiledPredicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Compiles an expression into a callable predicate.
///
/// Expressions produced by [`build`](crate::build) always compile. Hand-built
/// expressions whose literal does not have the field's exact type, or whose
/// operator does not apply to the field, are rejected with
/// [`FilterError::Compilation`].
pub fn compile<R: 'static>(expr: &AbstractPredicate<R>) -> Result<CompiledPredicate<R>> {
    let field = expr.field();
    let field_type = field.field_type();
    let description = expr.to_string();

    if let Err(message) = validate(expr) {
        error!(field = field.name(), %description, %message, "refusing to compile predicate");
        return Err(FilterError::Compilation(message));
    }

    let extract = field.extractor();
    let predicate = match expr {
        AbstractPredicate::Compare { op, literal, .. } => {
            compare_kernel(extract, *op, literal.clone(), description)
        }
        AbstractPredicate::Method {
            method, argument, ..
        } => {
            let (method, argument) = (*method, argument.clone());
            CompiledPredicate::from_fn(description, move |r: &R| match extract(r) {
                Value::String(s) => method.eval(s, &argument),
                _ => false,
            })
        }
    };

    debug!(
        field = field.name(),
        field_type = %field_type,
        op = %expr.op(),
        predicate = predicate.description(),
        "compiled predicate"
    );
    Ok(predicate)
}

fn validate<R>(expr: &AbstractPredicate<R>) -> std::result::Result<(), String> {
    let field = expr.field();
    let field_type = field.field_type();

    if !is_applicable(expr.op(), field_type) {
        return Err(format!(
            "operator {} does not apply to {} field '{}'",
            expr.op(),
            field_type,
            field.name()
        ));
    }
    if let AbstractPredicate::Compare { literal, .. } = expr {
        if !literal.is_exactly(field_type) {
            return Err(format!(
                "literal {} of type {} does not match {} field '{}'",
                literal,
                literal.literal_type(),
                field_type,
                field.name()
            ));
        }
    }
    Ok(())
}

// One closure per literal type, so the literal is matched once here instead
// of on every record. A record value of another type (or Null) never matches.
fn compare_kernel<R: 'static>(
    extract: Extractor<R>,
    op: RelationalOp,
    literal: Literal,
    description: String,
) -> CompiledPredicate<R> {
    match literal {
        Literal::Int(rhs) => CompiledPredicate::from_fn(description, move |r: &R| match extract(r) {
            Value::Int(lhs) => op.eval_ordering(lhs.cmp(&rhs)),
            _ => false,
        }),
        Literal::Decimal(rhs) => {
            CompiledPredicate::from_fn(description, move |r: &R| match extract(r) {
                Value::Decimal(lhs) => op.eval_ordering(lhs.cmp(&rhs)),
                _ => false,
            })
        }
        Literal::String(rhs) => {
            CompiledPredicate::from_fn(description, move |r: &R| match extract(r) {
                Value::String(lhs) => op.eval_ordering(lhs.cmp(rhs.as_str())),
                _ => false,
            })
        }
        Literal::Bool(rhs) => CompiledPredicate::from_fn(description, move |r: &R| match extract(r) {
            Value::Bool(lhs) => op.eval_ordering(lhs.cmp(&rhs)),
            _ => false,
        }),
        Literal::Date(rhs) => CompiledPredicate::from_fn(description, move |r: &R| match extract(r) {
            Value::Date(lhs) => op.eval_ordering(lhs.cmp(&rhs)),
            _ => false,
        }),
        Literal::Float(_) => unreachable!("validate rejects float literals"),
    }
}
