//! The range dictionary and its query entry points
//!
//! A query proceeds in three eager steps before anything is yielded:
//!
//! 1. boundaries are forced at the start and end of the window, splitting
//!    stored ranges or inserting blank ones as needed,
//! 2. uncovered spans left over by the first step are filled with blank
//!    ranges,
//! 3. a [`Segments`] iterator is handed out over the refined store.
//!
//! Stored ranges are never removed or merged.

use std::fmt;

use tracing::debug;

pub use self::iter::{Segment, Segments};
use crate::{attr::RangeAttribute, error::Error, store::RangeStore};

mod boundary;
mod gaps;
mod iter;

/// Which ranges a query yields, and how much of the store it scans for gaps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Yield only the ranges inside the window
    #[default]
    Window,
    /// Yield every stored range, flagging those inside the window.  Gaps
    /// anywhere in the store are filled first.
    Entire,
    /// Like [`Mode::Entire`], but only gaps inside the window are filled
    EntireScoped,
}

impl Mode {
    /// [`Mode::Entire`] if `entire` is set, otherwise [`Mode::Window`]
    #[inline]
    #[must_use]
    pub fn from_entire(entire: bool) -> Self { if entire { Self::Entire } else { Self::Window } }

    /// Returns true if queries in this mode yield every stored range
    #[inline]
    #[must_use]
    pub fn is_entire(self) -> bool { matches!(self, Self::Entire | Self::EntireScoped) }
}

/// A partition of an ordered key space into disjoint half-open ranges, each
/// carrying an attribute of type `A`
///
/// Ranges are created lazily: each query splits and fills the stored ranges
/// until its own bounds land on range edges.  Uncovered keys are represented
/// by the absence of a range until a query touches them, at which point they
/// receive a blank attribute produced by the factory `F`.
///
/// The dictionary provides no internal synchronization.
#[derive(Clone)]
pub struct RangeDict<K, A, F = fn() -> A> {
    store: RangeStore<K, A>,
    blank: F,
}

impl<K, A: Default> Default for RangeDict<K, A> {
    fn default() -> Self { Self::new() }
}

impl<K: fmt::Debug, A: fmt::Debug, F> fmt::Debug for RangeDict<K, A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Debug::fmt(&self.store, f) }
}

impl<K, A: Default> RangeDict<K, A> {
    /// Construct an empty dictionary whose blank attribute is `A::default()`
    #[inline]
    #[must_use]
    pub fn new() -> Self { Self::with_factory(A::default) }
}

impl<K, A, F> RangeDict<K, A, F> {
    /// Construct an empty dictionary producing blank attributes with `blank`
    #[inline]
    #[must_use]
    pub const fn with_factory(blank: F) -> Self {
        Self {
            store: RangeStore::new(),
            blank,
        }
    }

    /// The underlying range store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &RangeStore<K, A> { &self.store }

    /// Consume the dictionary, keeping only its stored ranges
    #[inline]
    #[must_use]
    pub fn into_store(self) -> RangeStore<K, A> { self.store }

    /// Returns true if no query has created a range yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.store.is_empty() }

    /// The number of stored ranges
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.store.len() }

    /// Iterate all stored ranges as `(begin, end, attr)` without refining
    /// anything
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &K, &A)> {
        self.store.iter().map(|(begin, rec)| (begin, &rec.end, &rec.attr))
    }
}

impl<K: Ord, A, F> RangeDict<K, A, F> {
    /// Look up the attribute of the range starting exactly at `begin`
    #[inline]
    #[must_use]
    pub fn get(&self, begin: &K) -> Option<(&K, &A)> {
        self.store.get(begin).map(|rec| (&rec.end, &rec.attr))
    }
}

impl<K: Ord + Clone + fmt::Debug, A: RangeAttribute, F: FnMut() -> A> RangeDict<K, A, F> {
    /// Refine the dictionary so that `begin` and `end` fall on range edges,
    /// then iterate the resulting ranges.
    ///
    /// An unspecified `begin` defaults to the lowest stored start, and an
    /// unspecified `end` to the highest stored end.  If `entire` is set every
    /// stored range is yielded, otherwise only those inside the window.
    ///
    /// # Errors
    /// This function returns an error if a bound is unspecified while the
    /// dictionary is empty, or if the resolved `begin` is not less than the
    /// resolved `end`.
    #[inline]
    pub fn query(
        &mut self,
        begin: Option<K>,
        end: Option<K>,
        entire: bool,
    ) -> Result<Segments<'_, K, A>, Error<K>> {
        self.query_with(begin, end, Mode::from_entire(entire))
    }

    /// Shorthand for a windowed query with explicit bounds
    ///
    /// # Errors
    /// This function returns an error if `begin` is not less than `end`.
    #[inline]
    pub fn window(&mut self, begin: K, end: K) -> Result<Segments<'_, K, A>, Error<K>> {
        self.query_with(Some(begin), Some(end), Mode::Window)
    }

    /// Shorthand for an entire-store query with explicit bounds
    ///
    /// # Errors
    /// This function returns an error if `begin` is not less than `end`.
    #[inline]
    pub fn entire(&mut self, begin: K, end: K) -> Result<Segments<'_, K, A>, Error<K>> {
        self.query_with(Some(begin), Some(end), Mode::Entire)
    }

    /// Refine the dictionary for the given window and iterate the result
    /// according to `mode`
    ///
    /// # Errors
    /// See [`query`](Self::query).
    pub fn query_with(
        &mut self,
        begin: Option<K>,
        end: Option<K>,
        mode: Mode,
    ) -> Result<Segments<'_, K, A>, Error<K>> {
        let (begin, end) = self.resolve(begin, end)?;

        if self.store.is_empty() {
            self.put_blank(begin.clone(), end.clone());
        }

        let start = self.ensure_boundary(&begin, &end);
        let close = self.close_boundary(&end);

        let gaps = match mode {
            Mode::Entire => gaps::find_gaps(&self.store, None),
            Mode::Window | Mode::EntireScoped => {
                gaps::find_gaps(self.store.slice(&begin, &end), Some(&end))
            },
        };
        let filled = self.fill_gaps(gaps);
        debug!(?begin, ?end, ?mode, ?start, ?close, filled, "Refined ranges");

        #[cfg(any(test, feature = "test"))]
        self.store.assert_invariants();

        Ok(if mode.is_entire() {
            Segments::entire(&mut self.store, begin, end)
        } else {
            Segments::window(&mut self.store, begin, end)
        })
    }

    fn resolve(&self, begin: Option<K>, end: Option<K>) -> Result<(K, K), Error<K>> {
        let begin = match begin {
            Some(b) => b,
            None => self.store.min_key().ok_or(Error::Unbounded)?.clone(),
        };
        let end = match end {
            Some(e) => e,
            None => {
                self.store
                    .max_record()
                    .ok_or(Error::Unbounded)?
                    .1
                    .end
                    .clone()
            },
        };

        if begin < end {
            Ok((begin, end))
        } else {
            Err(Error::InvalidRange { begin, end })
        }
    }
}
