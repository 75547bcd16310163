//! dynfilter - run-time predicate compiler for typed record collections.
//!
//! dynfilter turns a filter request that only exists at run time (a field
//! name, an operator token and a comparison value, as they might arrive from
//! a command line or a UI) into a compiled, reusable predicate, and applies
//! it lazily to a sequence of records.
//!
//! - Field names are resolved against a registered [`Schema`], exactly and
//!   case-sensitively
//! - Operators are validated against the field's declared type before
//!   anything is evaluated
//! - Literals are converted to the field's type once (integers widen to
//!   decimals)
//! - The compiled predicate is a plain closure: no reflection, no expression
//!   walking per record
//! - Filtering is lazy and order preserving
//!
//! # Quick Start
//!
//! ```rust
//! use dynfilter::{filter_dynamic, FieldType, Record, Schema, Value};
//! use once_cell::sync::Lazy;
//!
//! struct Customer {
//!     name: String,
//!     age: u8,
//! }
//!
//! fn customer_name(c: &Customer) -> Value<'_> {
//!     Value::String(&c.name)
//! }
//!
//! fn customer_age(c: &Customer) -> Value<'_> {
//!     Value::Int(c.age.into())
//! }
//!
//! impl Record for Customer {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: Lazy<Schema<Customer>> = Lazy::new(|| {
//!             Schema::builder("Customer")
//!                 .field("name", FieldType::String, customer_name)
//!                 .field("age", FieldType::Int, customer_age)
//!                 .build()
//!         });
//!         &SCHEMA
//!     }
//! }
//!
//! let customers = vec![
//!     Customer { name: "ahmed".into(), age: 18 },
//!     Customer { name: "Mona".into(), age: 25 },
//!     Customer { name: "mohamed".into(), age: 17 },
//! ];
//!
//! let young: Vec<_> = filter_dynamic(&customers, "age", "LessThan", 19)?
//!     .map(|c| c.name.as_str())
//!     .collect();
//! assert_eq!(young, ["ahmed", "mohamed"]);
//!
//! // String operators are case-sensitive
//! let m: Vec<_> = filter_dynamic(&customers, "name", "StartsWith", "m")?
//!     .map(|c| c.name.as_str())
//!     .collect();
//! assert_eq!(m, ["mohamed"]);
//!
//! // Invalid requests fail before any record is read
//! assert!(filter_dynamic(&customers, "age", "Contains", 19).is_err());
//! # Ok::<(), dynfilter::FilterError>(())
//! ```
//!
//! With the `derive` feature, `#[derive(Record)]` generates the schema:
//!
//! ```rust,ignore
//! use dynfilter::Record;
//!
//! #[derive(Record)]
//! struct Customer {
//!     #[field(String)]
//!     name: String,
//!     #[field(Int)]
//!     age: u8,
//! }
//! ```
//!
//! # Pipeline
//!
//! ```text
//! (field, token, value)
//!   -> resolve    field name  -> FieldAccessor     (FieldNotFound)
//!   -> classify   token, type -> OperatorSpec      (UnknownOperator, UnsupportedOperator)
//!   -> build      + literal   -> AbstractPredicate (LiteralConversion)
//!   -> compile                -> CompiledPredicate (Compilation)
//!   -> filter     + source    -> Filtered          (lazy)
//! ```
//!
//! Each stage is public and can be used on its own; [`Compiler`] runs them in
//! sequence and caches the literal-independent part of each request.
//!
//! # Field Types and Operators
//!
//! | Type | Operators |
//! |------|-----------|
//! | Int, Decimal, Date | `Equal`, `NotEqual`, `LessThan`, `LessThanOrEqual`, `GreaterThan`, `GreaterThanOrEqual` |
//! | String | all of the above (ordinal), `Contains`, `StartsWith`, `EndsWith` |
//! | Bool | `Equal`, `NotEqual` |
//!
//! `LessOrEqual` and `GreaterOrEqual` are accepted as aliases.

mod cache;
mod compile;
mod config;
mod engine;
mod error;
mod expr;
mod filter;
mod literal;
mod op;
mod registry;
mod request;
mod schema;
mod value;

use once_cell::sync::Lazy;

pub use cache::{CacheStats, PredicateCache, ShapeKey};
pub use compile::{compile, CompiledPredicate};
pub use config::{CacheConfig, FilterConfig, DEFAULT_CACHE_CAPACITY};
pub use engine::Compiler;
pub use error::{ConfigError, ConversionFailure, FilterError, Result};
pub use expr::{build, AbstractPredicate, NodeKind};
pub use filter::{filter, FilterExt, Filtered, LiveCursor, LiveSource};
pub use literal::{Literal, LiteralType, DATE_FORMAT};
pub use op::{Op, OperatorCategory, RelationalOp, StringOp};
pub use registry::{classify, classify_token, is_applicable, OperatorSpec};
pub use request::PredicateRequest;
pub use schema::{resolve, Extractor, FieldAccessor, Record, Schema, SchemaBuilder, SchemaId};
pub use value::{FieldType, FieldTypeCapabilities, Value};

pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;

#[cfg(feature = "derive")]
pub use dynfilter_macros::Record;

static DEFAULT_COMPILER: Lazy<Compiler> = Lazy::new(Compiler::default);

/// Returns the process-wide compiler used by [`filter_dynamic`].
pub fn default_compiler() -> &'static Compiler {
    &DEFAULT_COMPILER
}

/// Filters `records` on `field <operator> value`.
///
/// The request is validated immediately: an unknown field, an unknown or
/// inapplicable operator, or a value that cannot be converted to the field's
/// type is returned as an error and no record is read. On success the
/// returned iterator evaluates records one at a time as it is consumed.
///
/// Uses the shared [`default_compiler`]; see [`Compiler::filter_dynamic`] to
/// supply your own.
pub fn filter_dynamic<'a, R, I>(
    records: I,
    field: &str,
    operator: &str,
    value: impl Into<Literal>,
) -> Result<Filtered<I, R>>
where
    R: Record,
    I: IntoIterator<Item = &'a R>,
{
    DEFAULT_COMPILER.filter_dynamic(records, field, operator, value)
}

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
