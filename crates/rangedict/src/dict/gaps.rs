use std::fmt;

use tracing::trace;

use super::RangeDict;
use crate::{attr::RangeAttribute, store::Record};

/// Collect every uncovered span between consecutive ranges of `ranges`,
/// which must be sorted by start.  If `until` is given, the span between the
/// last range and `until` is reported as well.
pub(super) fn find_gaps<'a, K: Ord + Clone + 'a, A: 'a>(
    ranges: impl IntoIterator<Item = (&'a K, &'a Record<K, A>)>,
    until: Option<&K>,
) -> Vec<(K, K)> {
    let mut gaps = vec![];
    let mut prev_end: Option<&K> = None;

    for (begin, Record { end, .. }) in ranges {
        if let Some(prev) = prev_end.filter(|&p| p != begin) {
            debug_assert!(prev < begin);
            gaps.push((prev.clone(), begin.clone()));
        }

        prev_end = Some(end);
    }

    if let Some((prev, until)) = prev_end.zip(until).filter(|(p, u)| p < u) {
        gaps.push((prev.clone(), until.clone()));
    }

    gaps
}

impl<K: Ord + Clone + fmt::Debug, A: RangeAttribute, F: FnMut() -> A> RangeDict<K, A, F> {
    /// Cover every span in `gaps` with a blank range
    pub(super) fn fill_gaps(&mut self, gaps: Vec<(K, K)>) -> usize {
        let n = gaps.len();

        for (begin, end) in gaps {
            trace!(?begin, ?end, "Filling gap");
            self.put_blank(begin, end);
        }

        n
    }
}
