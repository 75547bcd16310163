//! Error types for the dynfilter crate.
//!
//! Every failure is raised before any record is evaluated: a request either
//! yields a working predicate or one of the [`FilterError`] variants below.

use std::path::PathBuf;

use thiserror::Error;

use crate::literal::LiteralType;
use crate::op::Op;
use crate::value::FieldType;

/// Errors that can occur while turning a request into a predicate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// The field name does not exist on the record schema.
    #[error("field '{field}' does not exist on {schema}")]
    FieldNotFound { field: String, schema: &'static str },

    /// The operator token is not part of the supported set.
    #[error("unknown operator '{token}'")]
    UnknownOperator { token: String },

    /// The operator is known but cannot be applied to the field's type.
    #[error("operator {op} cannot be applied to {field_type} field '{field}'")]
    UnsupportedOperator {
        op: Op,
        field: String,
        field_type: FieldType,
    },

    /// The comparison value cannot be converted to the field's type.
    #[error("value for field '{field}' cannot be used as {expected} (got {found}): {reason}")]
    LiteralConversion {
        field: String,
        expected: FieldType,
        found: LiteralType,
        #[source]
        reason: ConversionFailure,
    },

    /// The expression tree is internally inconsistent.
    #[error("malformed predicate: {0}")]
    Compilation(String),
}

impl FilterError {
    /// Short, stable name of the variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterError::FieldNotFound { .. } => "field_not_found",
            FilterError::UnknownOperator { .. } => "unknown_operator",
            FilterError::UnsupportedOperator { .. } => "unsupported_operator",
            FilterError::LiteralConversion { .. } => "literal_conversion",
            FilterError::Compilation(_) => "compilation",
        }
    }
}

/// Why a literal could not be converted to a field type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionFailure {
    /// No conversion exists between the two kinds.
    #[error("incompatible kinds")]
    KindMismatch,

    /// Floating point value is NaN or infinite.
    #[error("value is not finite")]
    NotFinite,

    /// Value does not fit in the target representation.
    #[error("value is out of range")]
    OutOfRange,

    /// Text input could not be parsed as the target type.
    #[error("cannot parse '{0}'")]
    Unparseable(String),
}

/// Errors raised while loading a [`FilterConfig`](crate::FilterConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid YAML for the schema.
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for dynfilter operations.
pub type Result<T> = std::result::Result<T, FilterError>;
