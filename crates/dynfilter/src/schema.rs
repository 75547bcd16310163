//! Record schemas and field resolution.
//!
//! A [`Schema`] is the registered map from field name to typed accessor for
//! one record type. It is built once (usually behind a `Lazy` static, either
//! by hand or by `#[derive(Record)]`) and never changes afterwards.
//!
//! ```rust
//! use dynfilter::{resolve, FieldType, Record, Schema, Value};
//! use once_cell::sync::Lazy;
//!
//! struct City {
//!     name: String,
//!     population: u32,
//! }
//!
//! fn city_name(c: &City) -> Value<'_> {
//!     Value::String(&c.name)
//! }
//!
//! fn city_population(c: &City) -> Value<'_> {
//!     Value::Int(c.population.into())
//! }
//!
//! impl Record for City {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: Lazy<Schema<City>> = Lazy::new(|| {
//!             Schema::builder("City")
//!                 .field("name", FieldType::String, city_name)
//!                 .field("population", FieldType::Int, city_population)
//!                 .build()
//!         });
//!         &SCHEMA
//!     }
//! }
//!
//! let accessor = resolve(City::schema(), "population").unwrap();
//! assert_eq!(accessor.field_type(), FieldType::Int);
//! assert!(resolve(City::schema(), "Population").is_err());
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use crate::error::{FilterError, Result};
use crate::value::{FieldType, Value};

/// Reads one field from a record.
pub type Extractor<R> = for<'a> fn(&'a R) -> Value<'a>;

/// A record type with a registered schema.
///
/// Implement this by hand or with `#[derive(Record)]` (feature `derive`).
pub trait Record: 'static {
    /// Returns the schema describing this type's queryable fields.
    fn schema() -> &'static Schema<Self>
    where
        Self: Sized;
}

/// Identifies a schema: its name plus the Rust type it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaId {
    name: &'static str,
    type_id: TypeId,
}

impl SchemaId {
    /// Returns the identifier for record type `R`'s schema.
    pub fn of<R: Record>() -> SchemaId {
        R::schema().id()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A resolved field: its name, declared type, and extractor.
pub struct FieldAccessor<R> {
    name: &'static str,
    field_type: FieldType,
    extract: Extractor<R>,
}

impl<R> FieldAccessor<R> {
    pub fn new(name: &'static str, field_type: FieldType, extract: Extractor<R>) -> Self {
        FieldAccessor {
            name,
            field_type,
            extract,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Reads this field from `record`.
    pub fn get<'a>(&self, record: &'a R) -> Value<'a> {
        (self.extract)(record)
    }

    pub(crate) fn extractor(&self) -> Extractor<R> {
        self.extract
    }
}

// Manual impls: derives would require `R: Clone`/`R: Debug`.
impl<R> Clone for FieldAccessor<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FieldAccessor<R> {}

impl<R> fmt::Debug for FieldAccessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessor")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .finish()
    }
}

/// The queryable fields of record type `R`.
pub struct Schema<R> {
    id: SchemaId,
    fields: Vec<FieldAccessor<R>>,
    index: HashMap<&'static str, usize>,
}

impl<R: 'static> Schema<R> {
    /// Starts building a schema named `name`.
    pub fn builder(name: &'static str) -> SchemaBuilder<R> {
        SchemaBuilder {
            name,
            fields: Vec::new(),
        }
    }
}

impl<R> Schema<R> {
    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.id.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldAccessor<R>] {
        &self.fields
    }

    /// Looks up a field by exact, case-sensitive name.
    pub fn get(&self, name: &str) -> Option<FieldAccessor<R>> {
        self.index.get(name).map(|&i| self.fields[i])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<R> fmt::Debug for Schema<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.id.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builder for [`Schema`].
pub struct SchemaBuilder<R> {
    name: &'static str,
    fields: Vec<FieldAccessor<R>>,
}

impl<R: 'static> SchemaBuilder<R> {
    /// Registers a field.
    pub fn field(mut self, name: &'static str, field_type: FieldType, extract: Extractor<R>) -> Self {
        self.fields.push(FieldAccessor::new(name, field_type, extract));
        self
    }

    /// Finishes the schema.
    ///
    /// Schemas are static declarations, so a duplicate field name is a
    /// programming error and panics here, at first use of the schema.
    pub fn build(self) -> Schema<R> {
        let mut index = HashMap::with_capacity(self.fields.len());
        for (i, field) in self.fields.iter().enumerate() {
            if index.insert(field.name, i).is_some() {
                panic!(
                    "schema {} declares field '{}' more than once",
                    self.name, field.name
                );
            }
        }
        Schema {
            id: SchemaId {
                name: self.name,
                type_id: TypeId::of::<R>(),
            },
            fields: self.fields,
            index,
        }
    }
}

/// Resolves `field` on `schema`.
///
/// Matching is exact and case-sensitive; no fuzzy or prefix matching is done.
pub fn resolve<R>(schema: &Schema<R>, field: &str) -> Result<FieldAccessor<R>> {
    schema.get(field).ok_or_else(|| FilterError::FieldNotFound {
        field: field.to_string(),
        schema: schema.name(),
    })
}
