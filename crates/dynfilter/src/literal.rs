//! Comparison literals and their conversion to field types.
//!
//! A [`Literal`] is the caller-supplied right-hand side of a predicate. Before
//! a predicate is built the literal is converted to the declared type of the
//! field it is compared against:
//!
//! | literal | int | decimal | string | bool | date |
//! |---------|-----|---------|--------|------|------|
//! | `Int` | yes | widened | | | |
//! | `Float` | | if finite | | | |
//! | `Decimal` | | yes | | | |
//! | `String` | | | yes | | |
//! | `Bool` | | | | yes | |
//! | `Date` | | | | | yes |
//!
//! Text coming from outside the program (command line, config files) goes
//! through [`Literal::parse`] instead, which reads the text according to the
//! field type.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ConversionFailure;
use crate::value::FieldType;

/// Date format accepted by [`Literal::parse`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An owned comparison value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    Bool(bool),
    Date(NaiveDate),
}

/// The kind of a [`Literal`], independent of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralType {
    Int,
    Float,
    Decimal,
    String,
    Bool,
    Date,
}

impl LiteralType {
    pub fn as_str(self) -> &'static str {
        match self {
            LiteralType::Int => "int",
            LiteralType::Float => "float",
            LiteralType::Decimal => "decimal",
            LiteralType::String => "string",
            LiteralType::Bool => "bool",
            LiteralType::Date => "date",
        }
    }
}

impl fmt::Display for LiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Literal {
    /// Returns the kind of this literal.
    pub fn literal_type(&self) -> LiteralType {
        match self {
            Literal::Int(_) => LiteralType::Int,
            Literal::Float(_) => LiteralType::Float,
            Literal::Decimal(_) => LiteralType::Decimal,
            Literal::String(_) => LiteralType::String,
            Literal::Bool(_) => LiteralType::Bool,
            Literal::Date(_) => LiteralType::Date,
        }
    }

    /// Returns `true` if the literal already has the representation of `target`.
    pub fn is_exactly(&self, target: FieldType) -> bool {
        matches!(
            (self, target),
            (Literal::Int(_), FieldType::Int)
                | (Literal::Decimal(_), FieldType::Decimal)
                | (Literal::String(_), FieldType::String)
                | (Literal::Bool(_), FieldType::Bool)
                | (Literal::Date(_), FieldType::Date)
        )
    }

    /// Converts the literal to the representation of `target`.
    ///
    /// Integers widen to decimals. Narrowing (decimal or float to int) and
    /// cross-kind conversions fail with [`ConversionFailure::KindMismatch`].
    pub fn coerce(self, target: FieldType) -> Result<Literal, ConversionFailure> {
        match (self, target) {
            (lit @ Literal::Int(_), FieldType::Int) => Ok(lit),
            (Literal::Int(n), FieldType::Decimal) => Ok(Literal::Decimal(Decimal::from(n))),
            (Literal::Float(x), FieldType::Decimal) => {
                if !x.is_finite() {
                    return Err(ConversionFailure::NotFinite);
                }
                Decimal::try_from(x)
                    .map(Literal::Decimal)
                    .map_err(|_| ConversionFailure::OutOfRange)
            }
            (lit @ Literal::Decimal(_), FieldType::Decimal) => Ok(lit),
            (lit @ Literal::String(_), FieldType::String) => Ok(lit),
            (lit @ Literal::Bool(_), FieldType::Bool) => Ok(lit),
            (lit @ Literal::Date(_), FieldType::Date) => Ok(lit),
            _ => Err(ConversionFailure::KindMismatch),
        }
    }

    /// Parses untyped text as a literal of `target`'s type.
    ///
    /// Surrounding whitespace is ignored for every type except strings, which
    /// are taken verbatim. Booleans accept `true` and `false`; dates use
    /// `YYYY-MM-DD`.
    pub fn parse(target: FieldType, text: &str) -> Result<Literal, ConversionFailure> {
        let unparseable = || ConversionFailure::Unparseable(text.to_string());
        let trimmed = text.trim();
        match target {
            FieldType::Int => trimmed
                .parse::<i64>()
                .map(Literal::Int)
                .map_err(|_| unparseable()),
            FieldType::Decimal => Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map(Literal::Decimal)
                .map_err(|_| unparseable()),
            FieldType::String => Ok(Literal::String(text.to_string())),
            FieldType::Bool => trimmed
                .parse::<bool>()
                .map(Literal::Bool)
                .map_err(|_| unparseable()),
            FieldType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(Literal::Date)
                .map_err(|_| unparseable()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::Decimal(d) => write!(f, "{}", d),
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

// ============================================================================
// From implementations
// ============================================================================

macro_rules! int_literal {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Literal {
                fn from(n: $ty) -> Self {
                    Literal::Int(i64::from(n))
                }
            }
        )*
    };
}

int_literal!(i8, i16, i32, i64, u8, u16, u32);

/// Integer types wider than `i64` (or platform sized) convert only when the
/// value fits.
macro_rules! checked_int_literal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TryFrom<$ty> for Literal {
                type Error = ConversionFailure;

                fn try_from(n: $ty) -> Result<Self, Self::Error> {
                    i64::try_from(n)
                        .map(Literal::Int)
                        .map_err(|_| ConversionFailure::OutOfRange)
                }
            }
        )*
    };
}

checked_int_literal!(u64, usize, isize, i128, u128);

impl From<f32> for Literal {
    fn from(x: f32) -> Self {
        Literal::Float(f64::from(x))
    }
}

impl From<f64> for Literal {
    fn from(x: f64) -> Self {
        Literal::Float(x)
    }
}

impl From<Decimal> for Literal {
    fn from(d: Decimal) -> Self {
        Literal::Decimal(d)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<NaiveDate> for Literal {
    fn from(d: NaiveDate) -> Self {
        Literal::Date(d)
    }
}
