//! Attributes attached to stored ranges
//!
//! Whenever a query splits a stored range in two, the dictionary calls
//! [`RangeAttribute::copy`] once for each half.  The two results must be
//! independently mutable afterward: an implementation that shares state
//! between copies (or that drops its state) will silently lose or leak
//! content across every split, and the dictionary has no way to notice.

use std::fmt;

/// A value attached to a range that can be duplicated when the range splits
pub trait RangeAttribute {
    /// Produce an independent duplicate of this attribute
    #[must_use]
    fn copy(&self) -> Self;
}

/// The stateless default attribute
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlankAttribute;

impl RangeAttribute for BlankAttribute {
    #[inline]
    fn copy(&self) -> Self { Self }
}

impl fmt::Display for BlankAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("<RangeAttribute>") }
}

/// An attribute accumulating a list of markers
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListAttribute<T>(Vec<T>);

impl<T> Default for ListAttribute<T> {
    fn default() -> Self { Self::new() }
}

impl<T> ListAttribute<T> {
    /// Construct an empty list
    #[inline]
    #[must_use]
    pub const fn new() -> Self { Self(Vec::new()) }

    /// Append a marker to the end of the list
    #[inline]
    pub fn push(&mut self, marker: T) { self.0.push(marker); }

    /// The number of markers in the list
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    /// Returns true if no markers have been pushed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// View the markers in insertion order
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] { &self.0 }

    /// Iterate the markers in insertion order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> { self.0.iter() }
}

impl<T: Clone> RangeAttribute for ListAttribute<T> {
    fn copy(&self) -> Self { Self(self.0.clone()) }
}

impl<T> From<Vec<T>> for ListAttribute<T> {
    #[inline]
    fn from(markers: Vec<T>) -> Self { Self(markers) }
}

impl<T> Extend<T> for ListAttribute<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, it: I) { self.0.extend(it); }
}

impl<'a, T> IntoIterator for &'a ListAttribute<T> {
    type IntoIter = std::slice::Iter<'a, T>;
    type Item = &'a T;

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<T: fmt::Display> fmt::Display for ListAttribute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;

        for (i, marker) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }

            fmt::Display::fmt(marker, f)?;
        }

        f.write_str("]")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn list_copy_is_independent() {
        let mut a = ListAttribute::from(vec!["out"]);
        let mut b = a.copy();

        a.push("left");
        b.push("right");

        assert_eq!(a.as_slice(), &["out", "left"]);
        assert_eq!(b.as_slice(), &["out", "right"]);
    }

    #[test]
    fn list_display() {
        let mut a = ListAttribute::new();
        assert_eq!(a.to_string(), "[]");

        a.extend(["hoge", "out"]);
        assert_eq!(a.to_string(), "[hoge, out]");
    }

    #[test]
    fn list_len() {
        let mut a = ListAttribute::default();
        assert!(a.is_empty());
        assert_eq!(a.len(), 0);

        a.push(1);
        a.push(2);
        assert!(!a.is_empty());
        assert_eq!(a.len(), 2);
        assert_eq!(a.iter().copied().collect::<Vec<i32>>(), [1, 2]);
    }

    #[test]
    fn blank_copy() {
        assert_eq!(BlankAttribute.copy(), BlankAttribute);
        assert_eq!(BlankAttribute.to_string(), "<RangeAttribute>");
    }
}
