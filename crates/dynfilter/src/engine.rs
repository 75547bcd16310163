//! The compiler front end: request in, predicate out.
//!
//! [`Compiler`] runs the whole pipeline for a [`PredicateRequest`]:
//!
//! ```text
//! resolve field -> classify operator -> convert literal -> build -> compile
//! ```
//!
//! The first two steps depend only on the request's shape and are cached when
//! the shape cache is enabled.

use tracing::{debug, trace};

use crate::cache::{CacheStats, PredicateCache, PredicateShape, ShapeKey};
use crate::compile::{compile, CompiledPredicate};
use crate::config::FilterConfig;
use crate::error::Result;
use crate::expr::{build, AbstractPredicate};
use crate::filter::{filter, Filtered};
use crate::literal::Literal;
use crate::registry::{classify, OperatorSpec};
use crate::request::PredicateRequest;
use crate::schema::{resolve, FieldAccessor, Record};

/// Turns requests into compiled predicates.
///
/// A `Compiler` is `Send + Sync`; one instance can serve many threads.
#[derive(Debug)]
pub struct Compiler {
    cache: Option<PredicateCache>,
}

impl Compiler {
    pub fn new(config: &FilterConfig) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| PredicateCache::new(config.cache.capacity));
        Compiler { cache }
    }

    /// A compiler without a shape cache.
    pub fn uncached() -> Self {
        Compiler { cache: None }
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Builds the abstract expression for `request` against `R`'s schema.
    pub fn expression<R: Record>(&self, request: &PredicateRequest) -> Result<AbstractPredicate<R>> {
        let result = self
            .shape::<R>(request)
            .and_then(|(field, spec)| build(field, spec, request.literal().clone()));
        if let Err(err) = &result {
            debug!(
                schema = R::schema().name(),
                kind = err.kind(),
                %request,
                "rejected predicate request"
            );
        }
        result
    }

    /// Resolves, validates and compiles `request`.
    pub fn compile<R: Record>(&self, request: &PredicateRequest) -> Result<CompiledPredicate<R>> {
        compile(&self.expression::<R>(request)?)
    }

    /// Validates the request now and returns a lazy filter over `records`.
    ///
    /// `operator` is a token such as `"LessThan"`. Errors are returned before
    /// any record is read.
    pub fn filter_dynamic<'a, R, I>(
        &self,
        records: I,
        field: &str,
        operator: &str,
        value: impl Into<Literal>,
    ) -> Result<Filtered<I, R>>
    where
        R: Record,
        I: IntoIterator<Item = &'a R>,
    {
        // The field is checked before the operator token, so an unknown field
        // is reported as such whatever the operator.
        let request = resolve(R::schema(), field)
            .and_then(|_| PredicateRequest::parse(field, operator, value))
            .map_err(|err| {
                debug!(kind = err.kind(), field, token = operator, "rejected predicate request");
                err
            })?;
        let predicate = self.compile::<R>(&request)?;
        Ok(filter(records, predicate))
    }

    /// Cache counters; all zero when caching is disabled.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache
            .as_ref()
            .map(PredicateCache::stats)
            .unwrap_or_default()
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    fn shape<R: Record>(&self, request: &PredicateRequest) -> Result<(FieldAccessor<R>, OperatorSpec)> {
        let schema = R::schema();
        let key = self.cache.as_ref().map(|_| {
            ShapeKey::new(
                schema.id(),
                request.field(),
                request.op(),
                request.literal().literal_type(),
            )
        });

        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(shape) = cache.get::<R>(key) {
                return Ok((shape.field, shape.spec));
            }
        }

        let field = resolve(schema, request.field())?;
        let spec = classify(request.op(), field.name(), field.field_type())?;

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            if !cache.insert(key, PredicateShape { field, spec }) {
                trace!(schema = schema.name(), "compiled without caching");
            }
        }
        Ok((field, spec))
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new(&FilterConfig::default())
    }
}
