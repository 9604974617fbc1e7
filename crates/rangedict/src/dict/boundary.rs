use std::fmt;

use tracing::trace;

use super::RangeDict;
use crate::attr::RangeAttribute;

/// What establishing a boundary did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Refinement {
    /// A stored range already started (or ended) at the key
    Existing,
    /// A blank range was inserted to cover the key
    Blank,
    /// A stored range was split in two at the key
    Split,
}

impl<K: Ord + Clone + fmt::Debug, A: RangeAttribute, F: FnMut() -> A> RangeDict<K, A, F> {
    /// Guarantee that a stored range starts exactly at `key`.  Blank ranges
    /// created here never extend past `limit`.
    ///
    /// The store must be non-empty and `key` must be less than `limit`.
    pub(super) fn ensure_boundary(&mut self, key: &K, limit: &K) -> Refinement {
        debug_assert!(key < limit);

        let floor = self
            .store
            .floor(key)
            .map(|(begin, rec)| (begin.clone(), rec.end.clone()));

        let Some((floor_begin, floor_end)) = floor else {
            // key precedes every stored range
            let end = self
                .store
                .min_key()
                .map_or(limit, |min| min.min(limit))
                .clone();
            self.put_blank(key.clone(), end);
            return Refinement::Blank;
        };

        if *key >= floor_end {
            let end = self
                .store
                .successor(&floor_begin)
                .map_or(limit, |(next, _)| next.min(limit))
                .clone();
            self.put_blank(key.clone(), end);
            Refinement::Blank
        } else if floor_begin < *key {
            self.split(&floor_begin, key.clone());
            Refinement::Split
        } else {
            Refinement::Existing
        }
    }

    /// Guarantee that no stored range crosses `key`, and that the range
    /// covering the keys just below it ends exactly at `key`.
    pub(super) fn close_boundary(&mut self, key: &K) -> Refinement {
        let floor = self
            .store
            .floor(key)
            .map(|(begin, rec)| (begin.clone(), rec.end.clone()));

        // Nothing starts at or below key, so nothing can cross it
        let Some((floor_begin, floor_end)) = floor else {
            return Refinement::Existing;
        };

        if *key > floor_end {
            self.put_blank(floor_end, key.clone());
            Refinement::Blank
        } else if floor_begin < *key && *key < floor_end {
            self.split(&floor_begin, key.clone());
            Refinement::Split
        } else {
            Refinement::Existing
        }
    }

    /// Split the range starting at `begin` so that its upper half starts at
    /// `at`.  Both halves receive fresh copies of the original attribute.
    fn split(&mut self, begin: &K, at: K) {
        let rec = self
            .store
            .get_mut(begin)
            .unwrap_or_else(|| unreachable!("No range stored at {begin:?}"));

        debug_assert!(*begin < at && at < rec.end);
        let end = std::mem::replace(&mut rec.end, at.clone());
        let upper = rec.attr.copy();
        rec.attr = rec.attr.copy();

        trace!(?begin, ?at, ?end, "Splitting range");
        let prev = self.store.put(at, end, upper);
        debug_assert!(prev.is_none());
    }

    pub(super) fn put_blank(&mut self, begin: K, end: K) {
        debug_assert!(begin < end);
        trace!(?begin, ?end, "Inserting blank range");

        let attr = (self.blank)();
        let prev = self.store.put(begin, end, attr);
        debug_assert!(prev.is_none());
    }
}
