use std::{collections::btree_map, iter::FusedIterator};

use crate::store::{RangeStore, Record};

/// A range yielded by a query
#[derive(Debug)]
pub struct Segment<'a, K, A> {
    /// Start of the range (inclusive)
    pub begin: &'a K,
    /// End of the range (exclusive)
    pub end: &'a K,
    /// The range's attribute, open for in-place mutation
    pub attr: &'a mut A,
    /// Whether the range lies within the queried window.  Always `true` for
    /// windowed queries.
    pub in_range: bool,
}

impl<'a, K, A> Segment<'a, K, A> {
    /// Decompose into `(begin, end, attr)`
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (&'a K, &'a K, &'a mut A) { (self.begin, self.end, self.attr) }
}

#[derive(Debug)]
enum Inner<'a, K, A> {
    Window(btree_map::RangeMut<'a, K, Record<K, A>>),
    Entire(btree_map::IterMut<'a, K, Record<K, A>>),
}

/// Iterator over the ranges produced by a query, in ascending order
///
/// All refinement of the dictionary has already happened by the time this is
/// constructed; iterating it only reads the store.
#[derive(Debug)]
pub struct Segments<'a, K, A> {
    inner: Inner<'a, K, A>,
    begin: K,
    end: K,
}

impl<'a, K: Ord, A> Segments<'a, K, A> {
    pub(super) fn window(store: &'a mut RangeStore<K, A>, begin: K, end: K) -> Self {
        Self {
            inner: Inner::Window(store.slice_mut(&begin, &end)),
            begin,
            end,
        }
    }

    pub(super) fn entire(store: &'a mut RangeStore<K, A>, begin: K, end: K) -> Self {
        Self {
            inner: Inner::Entire(store.iter_mut()),
            begin,
            end,
        }
    }

    /// The window this query was resolved to
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> (&K, &K) { (&self.begin, &self.end) }

    fn segment(&self, (begin, rec): (&'a K, &'a mut Record<K, A>)) -> Segment<'a, K, A> {
        let Record { end, attr } = rec;
        let in_range = match self.inner {
            Inner::Window(_) => true,
            Inner::Entire(_) => self.begin <= *begin && *end <= self.end,
        };

        Segment {
            begin,
            end,
            attr,
            in_range,
        }
    }
}

impl<'a, K: Ord, A> Iterator for Segments<'a, K, A> {
    type Item = Segment<'a, K, A>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.inner {
            Inner::Window(ref mut it) => it.next(),
            Inner::Entire(ref mut it) => it.next(),
        }?;

        Some(self.segment(item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.inner {
            Inner::Window(ref it) => it.size_hint(),
            Inner::Entire(ref it) => it.size_hint(),
        }
    }
}

impl<K: Ord, A> DoubleEndedIterator for Segments<'_, K, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = match self.inner {
            Inner::Window(ref mut it) => it.next_back(),
            Inner::Entire(ref mut it) => it.next_back(),
        }?;

        Some(self.segment(item))
    }
}

impl<K: Ord, A> FusedIterator for Segments<'_, K, A> {}
