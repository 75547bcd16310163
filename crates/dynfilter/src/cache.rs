//! Shape cache for repeated requests.
//!
//! Requests that differ only in their literal value share a *shape*: the
//! schema, field name, operator and literal type. A shape remembers the
//! resolved accessor and the classified operator so that resolution and
//! classification run once per shape. The literal itself is bound per request.
//!
//! The cache stores shapes for any record type behind `dyn Any`; the
//! [`SchemaId`] in the key carries the record's `TypeId`, so a lookup can only
//! ever find a shape for the record type that inserted it.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::literal::LiteralType;
use crate::op::Op;
use crate::registry::OperatorSpec;
use crate::schema::{FieldAccessor, SchemaId};

/// Cache key: everything about a request except the literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeKey {
    schema: SchemaId,
    field: String,
    op: Op,
    literal_type: LiteralType,
}

impl ShapeKey {
    pub fn new(schema: SchemaId, field: &str, op: Op, literal_type: LiteralType) -> Self {
        ShapeKey {
            schema,
            field: field.to_string(),
            op,
            literal_type,
        }
    }
}

/// The literal-independent result of resolving and classifying a request.
pub(crate) struct PredicateShape<R> {
    pub(crate) field: FieldAccessor<R>,
    pub(crate) spec: OperatorSpec,
}

/// Hit/miss counters and current size of a [`PredicateCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Default)]
struct CacheInner {
    shapes: HashMap<ShapeKey, Arc<dyn Any + Send + Sync>>,
    hits: u64,
    misses: u64,
}

/// Bounded, thread-safe map from [`ShapeKey`] to cached shape.
pub struct PredicateCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl PredicateCache {
    /// Creates a cache holding at most `capacity` shapes.
    ///
    /// Once full, further shapes are compiled without being cached.
    pub fn new(capacity: usize) -> Self {
        PredicateCache {
            capacity,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Shapes are immutable once inserted, so a panic in another holder
    // cannot leave the map half-updated.
    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn get<R: 'static>(&self, key: &ShapeKey) -> Option<Arc<PredicateShape<R>>> {
        let mut inner = self.lock();
        let found = inner
            .shapes
            .get(key)
            .cloned()
            .and_then(|shape| shape.downcast::<PredicateShape<R>>().ok());
        match found {
            Some(shape) => {
                inner.hits += 1;
                trace!(?key, "shape cache hit");
                Some(shape)
            }
            None => {
                inner.misses += 1;
                trace!(?key, "shape cache miss");
                None
            }
        }
    }

    /// Stores a shape. Returns `false` if the cache is full.
    pub(crate) fn insert<R: 'static>(&self, key: ShapeKey, shape: PredicateShape<R>) -> bool {
        let mut inner = self.lock();
        if inner.shapes.len() >= self.capacity && !inner.shapes.contains_key(&key) {
            trace!(?key, capacity = self.capacity, "shape cache full");
            return false;
        }
        inner.shapes.insert(key, Arc::new(shape));
        true
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            entries: inner.shapes.len(),
        }
    }

    /// Drops every cached shape and resets the counters.
    pub fn clear(&self) {
        *self.lock() = CacheInner::default();
    }
}

impl std::fmt::Debug for PredicateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateCache")
            .field("capacity", &self.capacity)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::RelationalOp;
    use crate::registry::classify;
    use crate::schema::{Record, Schema};
    use crate::value::{FieldType, Value};
    use once_cell::sync::Lazy;

    struct Gauge {
        level: i64,
    }

    fn gauge_level(g: &Gauge) -> Value<'_> {
        Value::Int(g.level)
    }

    impl Record for Gauge {
        fn schema() -> &'static Schema<Self> {
            static SCHEMA: Lazy<Schema<Gauge>> = Lazy::new(|| {
                Schema::builder("Gauge")
                    .field("level", FieldType::Int, gauge_level)
                    .build()
            });
            &SCHEMA
        }
    }

    fn shape() -> PredicateShape<Gauge> {
        let field = Gauge::schema().get("level").unwrap();
        let spec = classify(RelationalOp::LessThan.into(), "level", FieldType::Int).unwrap();
        PredicateShape { field, spec }
    }

    fn key(op: RelationalOp) -> ShapeKey {
        ShapeKey::new(SchemaId::of::<Gauge>(), "level", op.into(), LiteralType::Int)
    }

    #[test]
    fn miss_then_hit() {
        let cache = PredicateCache::new(8);
        assert!(cache.get::<Gauge>(&key(RelationalOp::LessThan)).is_none());
        assert!(cache.insert(key(RelationalOp::LessThan), shape()));
        let cached = cache.get::<Gauge>(&key(RelationalOp::LessThan)).unwrap();
        assert_eq!(cached.field.name(), "level");
        assert_eq!(cached.field.get(&Gauge { level: 4 }), Value::Int(4));

        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn full_cache_rejects_new_shapes() {
        let cache = PredicateCache::new(1);
        assert!(cache.insert(key(RelationalOp::LessThan), shape()));
        assert!(!cache.insert(key(RelationalOp::GreaterThan), shape()));
        // replacing an existing key is still allowed
        assert!(cache.insert(key(RelationalOp::LessThan), shape()));
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn clear_resets() {
        let cache = PredicateCache::new(4);
        cache.insert(key(RelationalOp::Equal), shape());
        cache.get::<Gauge>(&key(RelationalOp::Equal));
        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn literal_type_is_part_of_the_key() {
        let a = ShapeKey::new(SchemaId::of::<Gauge>(), "level", RelationalOp::Equal.into(), LiteralType::Int);
        let b = ShapeKey::new(SchemaId::of::<Gauge>(), "level", RelationalOp::Equal.into(), LiteralType::Decimal);
        assert_ne!(a, b);
    }
}
