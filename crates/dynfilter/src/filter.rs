//! The lazy filter stage.
//!
//! [`filter`] wraps a source without touching it. The source's iterator is
//! only created on the first pull, and each element is tested only when the
//! consumer asks for the next match. Order is preserved; nothing is
//! deduplicated, sorted or truncated.
//!
//! [`LiveSource`] is a shared row buffer whose iterator reads each row at the
//! moment it is pulled, so edits made after the filter was set up (or between
//! pulls) show up in the output.

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use tracing::trace;

use crate::compile::CompiledPredicate;

/// Lazily filters `source` with `predicate`.
pub fn filter<S, R>(source: S, predicate: CompiledPredicate<R>) -> Filtered<S, R>
where
    S: IntoIterator,
    S::Item: Borrow<R>,
{
    Filtered {
        source: Some(source),
        iter: None,
        predicate,
    }
}

/// Iterator returned by [`filter`].
pub struct Filtered<S, R>
where
    S: IntoIterator,
{
    source: Option<S>,
    iter: Option<S::IntoIter>,
    predicate: CompiledPredicate<R>,
}

impl<S, R> Filtered<S, R>
where
    S: IntoIterator,
{
    pub fn predicate(&self) -> &CompiledPredicate<R> {
        &self.predicate
    }

    /// Returns `true` once the source has been opened by a first pull.
    pub fn is_started(&self) -> bool {
        self.iter.is_some()
    }
}

impl<S, R> Iterator for Filtered<S, R>
where
    S: IntoIterator,
    S::Item: Borrow<R>,
{
    type Item = S::Item;

    fn next(&mut self) -> Option<S::Item> {
        if self.iter.is_none() {
            let source = self.source.take()?;
            trace!(predicate = self.predicate.description(), "filter stage opened source");
            self.iter = Some(source.into_iter());
        }
        let predicate = &self.predicate;
        self.iter
            .as_mut()?
            .find(|item| predicate.matches(<S::Item as Borrow<R>>::borrow(item)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.iter {
            Some(iter) => (0, iter.size_hint().1),
            None if self.source.is_some() => (0, None),
            None => (0, Some(0)),
        }
    }
}

impl<S, R> FusedIterator for Filtered<S, R>
where
    S: IntoIterator,
    S::IntoIter: FusedIterator,
    S::Item: Borrow<R>,
{
}

impl<S, R> fmt::Debug for Filtered<S, R>
where
    S: IntoIterator,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filtered")
            .field("predicate", &self.predicate)
            .field("started", &self.is_started())
            .finish()
    }
}

/// Adds [`filter_by`](FilterExt::filter_by) to every [`IntoIterator`].
pub trait FilterExt: IntoIterator + Sized {
    /// Lazily keeps the elements matching `predicate`.
    fn filter_by<R>(self, predicate: &CompiledPredicate<R>) -> Filtered<Self, R>
    where
        Self::Item: Borrow<R>,
    {
        filter(self, predicate.clone())
    }
}

impl<S: IntoIterator> FilterExt for S {}

// ============================================================================
// LiveSource
// ============================================================================

/// A shared, mutable row buffer read at pull time.
///
/// Clones share the same rows. Iterating yields clones of the rows.
///
/// Open cursors are registered with the buffer, and `insert` and `remove`
/// shift the position of every cursor they happen in front of. A cursor
/// therefore never yields the same row twice and never skips a row that was
/// present ahead of it.
pub struct LiveSource<R> {
    shared: Arc<RwLock<Shared<R>>>,
}

struct Shared<R> {
    rows: Vec<R>,
    /// Position of the next row to read, one per open cursor.
    cursors: Vec<Weak<AtomicUsize>>,
}

impl<R> Shared<R> {
    /// Applies `shift` to the position of every open cursor and forgets
    /// the closed ones.
    fn shift_cursors(&mut self, shift: impl Fn(usize) -> usize) {
        self.cursors.retain(|cursor| match cursor.upgrade() {
            Some(next) => {
                let pos = next.load(Ordering::Relaxed);
                next.store(shift(pos), Ordering::Relaxed);
                true
            }
            None => false,
        });
    }
}

impl<R> LiveSource<R> {
    pub fn new(rows: Vec<R>) -> Self {
        LiveSource {
            shared: Arc::new(RwLock::new(Shared {
                rows,
                cursors: Vec::new(),
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Shared<R>> {
        self.shared.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Shared<R>> {
        self.shared.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, row: R) {
        self.write().rows.push(row);
    }

    /// Inserts `row` at `index`, clamped to the current length.
    ///
    /// Cursors already past `index` do not see the new row.
    pub fn insert(&self, index: usize, row: R) {
        let mut shared = self.write();
        let index = index.min(shared.rows.len());
        shared.rows.insert(index, row);
        shared.shift_cursors(|pos| if index < pos { pos + 1 } else { pos });
    }

    pub fn remove(&self, index: usize) -> Option<R> {
        let mut shared = self.write();
        if index >= shared.rows.len() {
            return None;
        }
        let row = shared.rows.remove(index);
        shared.shift_cursors(|pos| if index < pos { pos - 1 } else { pos });
        Some(row)
    }

    /// Applies `f` to every row in place.
    pub fn update_all(&self, f: impl FnMut(&mut R)) {
        self.write().rows.iter_mut().for_each(f);
    }

    pub fn len(&self) -> usize {
        self.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().rows.is_empty()
    }

    /// Returns a cursor positioned at the first row.
    pub fn cursor(&self) -> LiveCursor<R> {
        let next = Arc::new(AtomicUsize::new(0));
        let mut shared = self.write();
        shared.cursors.retain(|cursor| cursor.strong_count() > 0);
        shared.cursors.push(Arc::downgrade(&next));
        LiveCursor {
            shared: Arc::clone(&self.shared),
            next,
        }
    }
}

impl<R: Clone> LiveSource<R> {
    /// Copies the current rows.
    pub fn snapshot(&self) -> Vec<R> {
        self.read().rows.clone()
    }
}

impl<R> Clone for LiveSource<R> {
    fn clone(&self) -> Self {
        LiveSource {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R> Default for LiveSource<R> {
    fn default() -> Self {
        LiveSource::new(Vec::new())
    }
}

impl<R> fmt::Debug for LiveSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveSource")
            .field("len", &self.len())
            .finish()
    }
}

impl<R: Clone> IntoIterator for &LiveSource<R> {
    type Item = R;
    type IntoIter = LiveCursor<R>;

    fn into_iter(self) -> LiveCursor<R> {
        self.cursor()
    }
}

impl<R: Clone> IntoIterator for LiveSource<R> {
    type Item = R;
    type IntoIter = LiveCursor<R>;

    fn into_iter(self) -> LiveCursor<R> {
        self.cursor()
    }
}

/// Iterator over a [`LiveSource`], reading one row per pull.
///
/// Rows inserted or removed ahead of the cursor are seen or skipped
/// accordingly; rows inserted behind it are not seen.
pub struct LiveCursor<R> {
    shared: Arc<RwLock<Shared<R>>>,
    next: Arc<AtomicUsize>,
}

impl<R: Clone> Iterator for LiveCursor<R> {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        // Writers shift `next` under the write lock, so holding the read
        // lock keeps it stable until the row is taken.
        let shared = self.shared.read().unwrap_or_else(PoisonError::into_inner);
        let pos = self.next.load(Ordering::Relaxed);
        let row = shared.rows.get(pos)?.clone();
        self.next.store(pos + 1, Ordering::Relaxed);
        Some(row)
    }
}

impl<R> fmt::Debug for LiveCursor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveCursor")
            .field("next", &self.next.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn even() -> CompiledPredicate<i64> {
        CompiledPredicate::from_fn("even", |n: &i64| n % 2 == 0)
    }

    #[test]
    fn preserves_order() {
        let items = vec![4i64, 1, 2, 7, 2, 8];
        let out: Vec<_> = filter(&items, even()).copied().collect();
        assert_eq!(out, vec![4, 2, 2, 8]);
    }

    #[test]
    fn owned_items() {
        let out: Vec<i64> = filter(vec![1i64, 2, 3, 4], even()).collect();
        assert_eq!(out, vec![2, 4]);
    }

    #[test]
    fn empty_source() {
        let items: Vec<i64> = Vec::new();
        assert_eq!(filter(&items, even()).count(), 0);
    }

    #[test]
    fn evaluates_only_on_pull() {
        let calls = Cell::new(0);
        let source = (0i64..10).inspect(|_| calls.set(calls.get() + 1));
        let mut filtered = filter(source, even());
        assert_eq!(calls.get(), 0);
        assert!(!filtered.is_started());

        assert_eq!(filtered.next(), Some(0));
        assert_eq!(calls.get(), 1);
        assert_eq!(filtered.next(), Some(2));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn filter_by_extension() {
        let items = [3i64, 6, 9, 12];
        let out: Vec<_> = items.iter().filter_by(&even()).collect();
        assert_eq!(out, vec![&6, &12]);
    }

    #[test]
    fn live_source_sees_mutation_before_first_pull() {
        let live = LiveSource::new(vec![1i64, 2]);
        let filtered = filter(&live, even());
        live.push(4);
        live.remove(1);
        let out: Vec<i64> = filtered.collect();
        assert_eq!(out, vec![4]);
    }

    #[test]
    fn live_source_sees_mutation_between_pulls() {
        let live = LiveSource::new(vec![2i64, 3]);
        let mut filtered = filter(live.clone(), even());
        assert_eq!(filtered.next(), Some(2));
        live.push(10);
        assert_eq!(filtered.next(), Some(10));
        assert_eq!(filtered.next(), None);
    }

    #[test]
    fn live_source_update_all() {
        let live = LiveSource::new(vec![1i64, 3]);
        live.update_all(|n| *n += 1);
        assert_eq!(live.snapshot(), vec![2, 4]);
        live.insert(99, 5);
        assert_eq!(live.len(), 3);
        assert_eq!(live.remove(7), None);
    }

    #[test]
    fn insert_behind_cursor_is_not_yielded_again() {
        let live = LiveSource::new(vec![2i64, 4]);
        let mut cursor = live.cursor();
        assert_eq!(cursor.next(), Some(2));
        live.insert(0, 6);
        let rest: Vec<_> = cursor.collect();
        assert_eq!(rest, vec![4]);
        assert_eq!(live.snapshot(), vec![6, 2, 4]);
    }

    #[test]
    fn remove_behind_cursor_skips_nothing() {
        let live = LiveSource::new(vec![2i64, 4, 6, 8]);
        let mut filtered = filter(&live, even());
        assert_eq!(filtered.next(), Some(2));
        assert_eq!(filtered.next(), Some(4));
        assert_eq!(live.remove(0), Some(2));
        let rest: Vec<_> = filtered.collect();
        assert_eq!(rest, vec![6, 8]);
    }

    #[test]
    fn insert_at_cursor_is_yielded_next() {
        let live = LiveSource::new(vec![2i64, 4]);
        let mut cursor = live.cursor();
        assert_eq!(cursor.next(), Some(2));
        live.insert(1, 10);
        let rest: Vec<_> = cursor.collect();
        assert_eq!(rest, vec![10, 4]);
    }

    #[test]
    fn removing_the_next_row_moves_on() {
        let live = LiveSource::new(vec![2i64, 4, 6]);
        let mut cursor = live.cursor();
        assert_eq!(cursor.next(), Some(2));
        live.remove(1);
        assert_eq!(cursor.next(), Some(6));
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn cursors_shift_independently() {
        let live = LiveSource::new(vec![1i64, 2, 3]);
        let mut ahead = live.cursor();
        let mut behind = live.cursor();
        ahead.next();
        ahead.next();
        live.insert(1, 9);
        assert_eq!(ahead.collect::<Vec<_>>(), vec![3]);
        assert_eq!(behind.next(), Some(1));
        assert_eq!(behind.collect::<Vec<_>>(), vec![9, 2, 3]);
    }

    #[test]
    fn dropped_cursors_are_forgotten() {
        let live = LiveSource::new(vec![1i64]);
        for _ in 0..3 {
            drop(live.cursor());
        }
        let _open = live.cursor();
        live.insert(0, 0);
        assert_eq!(live.read().cursors.len(), 1);
    }
}
