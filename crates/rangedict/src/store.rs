//! Ordered storage for disjoint ranges, keyed by their start

use std::{
    collections::{btree_map, BTreeMap},
    fmt,
    ops::Bound,
};

/// The stored half of a range: its exclusive end and its attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record<K, A> {
    /// End of the range (exclusive)
    pub end: K,
    /// The attribute carried by the range
    pub attr: A,
}

impl<K, A> Record<K, A> {
    /// Construct a record ending at `end`
    #[inline]
    #[must_use]
    pub const fn new(end: K, attr: A) -> Self { Self { end, attr } }
}

/// A map from range starts to [`Record`]s
///
/// The store performs no validation of its own: callers are responsible for
/// keeping the stored ranges disjoint and non-empty.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RangeStore<K, A> {
    ranges: BTreeMap<K, Record<K, A>>,
}

impl<K, A> Default for RangeStore<K, A> {
    fn default() -> Self { Self::new() }
}

impl<K: fmt::Debug, A: fmt::Debug> fmt::Debug for RangeStore<K, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ranges
            .iter()
            .fold(&mut f.debug_map(), |d, (begin, Record { end, attr })| {
                d.entry(&(begin..end), attr)
            })
            .finish()
    }
}

impl<K, A> RangeStore<K, A> {
    /// Construct an empty store
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ranges: BTreeMap::new(),
        }
    }

    /// Returns true if no ranges are stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.ranges.is_empty() }

    /// The number of stored ranges
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.ranges.len() }

    /// Iterate all stored ranges in ascending order
    #[inline]
    pub fn iter(&self) -> btree_map::Iter<'_, K, Record<K, A>> { self.ranges.iter() }

    /// Iterate all stored ranges in ascending order, with mutable records
    #[inline]
    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, K, Record<K, A>> {
        self.ranges.iter_mut()
    }
}

#[cfg(any(test, feature = "test"))]
impl<K: Ord + fmt::Debug, A> RangeStore<K, A> {
    /// Panic if any stored range is empty or overlaps its successor
    pub fn assert_invariants(&self) {
        let mut prev_end: Option<&K> = None;

        for (begin, Record { end, .. }) in &self.ranges {
            assert!(begin < end, "Empty range {begin:?}..{end:?}");

            if let Some(prev_end) = prev_end {
                assert!(prev_end <= begin, "Range {begin:?}..{end:?} overlaps ..{prev_end:?}");
            }

            prev_end = Some(end);
        }
    }
}

impl<K: Ord, A> RangeStore<K, A> {
    /// The lowest stored range start
    #[inline]
    #[must_use]
    pub fn min_key(&self) -> Option<&K> { self.ranges.first_key_value().map(|(k, _)| k) }

    /// The stored range with the highest start
    #[inline]
    #[must_use]
    pub fn max_record(&self) -> Option<(&K, &Record<K, A>)> { self.ranges.last_key_value() }

    /// The record of the range starting exactly at `begin`
    #[inline]
    #[must_use]
    pub fn get(&self, begin: &K) -> Option<&Record<K, A>> { self.ranges.get(begin) }

    /// The record of the range starting exactly at `begin`, mutably
    #[inline]
    pub fn get_mut(&mut self, begin: &K) -> Option<&mut Record<K, A>> {
        self.ranges.get_mut(begin)
    }

    /// Insert a range starting at `begin`, replacing any range already
    /// stored there
    #[inline]
    pub fn put(&mut self, begin: K, end: K, attr: A) -> Option<Record<K, A>> {
        self.ranges.insert(begin, Record::new(end, attr))
    }

    /// The stored range with the greatest start not exceeding `key`
    #[inline]
    #[must_use]
    pub fn floor(&self, key: &K) -> Option<(&K, &Record<K, A>)> {
        self.ranges
            .range((Bound::Unbounded, Bound::Included(key)))
            .next_back()
    }

    /// The stored range with the least start strictly greater than `key`
    #[inline]
    #[must_use]
    pub fn successor(&self, key: &K) -> Option<(&K, &Record<K, A>)> {
        self.ranges
            .range((Bound::Excluded(key), Bound::Unbounded))
            .next()
    }

    /// All stored ranges whose start lies in `begin..end`, in ascending order
    #[inline]
    pub fn slice(&self, begin: &K, end: &K) -> btree_map::Range<'_, K, Record<K, A>> {
        self.ranges
            .range((Bound::Included(begin), Bound::Excluded(end)))
    }

    /// All stored ranges whose start lies in `begin..end`, with mutable
    /// records
    #[inline]
    pub fn slice_mut(&mut self, begin: &K, end: &K) -> btree_map::RangeMut<'_, K, Record<K, A>> {
        self.ranges
            .range_mut((Bound::Included(begin), Bound::Excluded(end)))
    }
}

impl<'a, K, A> IntoIterator for &'a RangeStore<K, A> {
    type IntoIter = btree_map::Iter<'a, K, Record<K, A>>;
    type Item = (&'a K, &'a Record<K, A>);

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

#[cfg(test)]
mod test {
    use super::*;

    type Store = RangeStore<u64, char>;

    fn store<I: IntoIterator<Item = (u64, u64, char)>>(it: I) -> Store {
        let mut s = Store::new();
        for (begin, end, attr) in it {
            assert!(s.put(begin, end, attr).is_none());
        }
        s.assert_invariants();
        s
    }

    #[test]
    fn empty() {
        let s = Store::new();

        assert!(s.is_empty());
        assert_eq!(s.min_key(), None);
        assert_eq!(s.max_record(), None);
        assert_eq!(s.floor(&0), None);
        assert_eq!(s.successor(&0), None);
        assert_eq!(s.slice(&0, &u64::MAX).count(), 0);
    }

    #[test]
    fn floor_and_successor() {
        let s = store([(120, 150, 'a'), (150, 200, 'b')]);

        assert_eq!(s.floor(&119), None);
        assert_eq!(s.floor(&120).map(|(k, _)| *k), Some(120));
        assert_eq!(s.floor(&121).map(|(k, _)| *k), Some(120));
        assert_eq!(s.floor(&149).map(|(k, _)| *k), Some(120));
        assert_eq!(s.floor(&150).map(|(k, _)| *k), Some(150));
        assert_eq!(s.floor(&151).map(|(k, _)| *k), Some(150));

        assert_eq!(s.successor(&0).map(|(k, _)| *k), Some(120));
        assert_eq!(s.successor(&120).map(|(k, _)| *k), Some(150));
        assert_eq!(s.successor(&150), None);
    }

    #[test]
    fn extremes() {
        let s = store([(0, 10, 'a'), (20, 30, 'b'), (40, 45, 'c')]);

        assert_eq!(s.len(), 3);
        assert_eq!(s.min_key(), Some(&0));
        assert_eq!(s.max_record(), Some((&40, &Record::new(45, 'c'))));
        assert_eq!(s.get(&20), Some(&Record::new(30, 'b')));
        assert_eq!(s.get(&25), None);
    }

    #[test]
    fn extremes_with_owned_keys() {
        let mut s = RangeStore::new();
        s.put("b".to_owned(), "c".to_owned(), ());
        s.put("a".to_owned(), "b".to_owned(), ());

        assert_eq!(s.min_key().map(String::as_str), Some("a"));
        assert_eq!(s.max_record().map(|(k, r)| (k.as_str(), r.end.as_str())), Some(("b", "c")));
    }

    #[test]
    fn slice_is_half_open() {
        let s = store([(0, 10, 'a'), (20, 30, 'b'), (40, 45, 'c')]);

        assert_eq!(s.slice(&0, &40).map(|(k, _)| *k).collect::<Vec<_>>(), [0, 20]);
        assert_eq!(s.slice(&1, &41).map(|(k, _)| *k).collect::<Vec<_>>(), [20, 40]);
        assert_eq!(s.slice(&10, &20).count(), 0);
    }

    #[test]
    fn put_overwrites() {
        let mut s = store([(0, 10, 'a')]);

        assert_eq!(s.put(0, 5, 'b'), Some(Record::new(10, 'a')));
        assert_eq!(s.get(&0), Some(&Record::new(5, 'b')));

        if let Some(rec) = s.get_mut(&0) {
            rec.attr = 'c';
        }
        assert_eq!(format!("{s:?}"), "{0..5: 'c'}");
    }

    #[test]
    #[should_panic(expected = "overlaps")]
    fn invariants_catch_overlap() { store([(0, 10, 'a'), (5, 15, 'b')]); }
}
