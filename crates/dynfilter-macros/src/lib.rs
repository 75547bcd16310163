//! Proc macros for dynfilter.
//!
//! - [`Record`] - Generate a `dynfilter::Record` implementation (the field
//!   schema) from struct field annotations
//!
//! The generated code refers to `::dynfilter`, so the crate using the derive
//! must depend on `dynfilter`. Usually the macro is reached through
//! `dynfilter`'s `derive` feature rather than by depending on this crate
//! directly.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `dynfilter::Record` for a struct with named fields.
///
/// Only fields carrying a `#[field(...)]` type are queryable; the rest are
/// ignored.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `Int` | Integer field (`i8`..`i64`, `u8`..`u32`) |
/// | `Decimal` | `rust_decimal::Decimal` field |
/// | `String` | Any field implementing `AsRef<str>` |
/// | `Bool` | `bool` field |
/// | `Date` | `chrono::NaiveDate` field |
/// | `optional` | The field is an `Option<_>` of the given type; `None` never matches |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Query name (default: the Rust field name) |
/// | `ty = "..."` | Type given as a string, e.g. `ty = "decimal"` |
///
/// # Struct Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[record(name = "...")]` | Schema name used in error messages (default: struct name) |
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Customer::SPEND_AVERAGE`)
/// 2. `impl dynfilter::Record`, backed by a lazily built static schema
///
/// # Example
///
/// ```ignore
/// use dynfilter::{filter_dynamic, Decimal, Record};
///
/// #[derive(Record)]
/// struct Customer {
///     #[field(String)]
///     name: String,
///
///     #[field(Int)]
///     age: u8,
///
///     #[field(Decimal, rename = "spendAverage")]
///     spend_average: Decimal,
///
///     // not queryable
///     notes: String,
/// }
///
/// let rich = filter_dynamic(&customers, Customer::SPEND_AVERAGE, "GreaterThanOrEqual", 2000)?;
/// ```
#[proc_macro_derive(Record, attributes(field, record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
