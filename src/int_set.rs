use core::fmt::Debug;

use crate::error::Result;
use crate::int_map::IntMap;
use crate::int_map::Keys;

/// A set of `u64` values backed by an [`IntMap`] with unit values.
///
/// Shares the map's probing, resizing and deletion behavior; `0` is a valid
/// member like any other.
#[derive(Clone, Default)]
pub struct IntSet {
    map: IntMap<()>,
}

impl PartialEq for IntSet {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl Eq for IntSet {}

impl Debug for IntSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl IntSet {
    /// Creates an empty set using the default fill factor.
    pub fn new() -> Self {
        Self { map: IntMap::new() }
    }

    /// Creates an empty set sized for `size_hint` members at the default fill
    /// factor.
    ///
    /// # Panics
    ///
    /// Panics if the bucket count needed for `size_hint` overflows `usize`.
    pub fn with_capacity(size_hint: usize) -> Self {
        Self {
            map: IntMap::with_capacity(size_hint),
        }
    }

    /// Creates an empty set sized for `size_hint` members with the given
    /// fill factor.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`IntMap::with_fill_factor`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fimap::IntSet;
    /// #
    /// let mut set = IntSet::with_fill_factor(16, 0.5)?;
    /// assert!(set.insert(3));
    /// assert!(!set.insert(3));
    /// assert!(IntSet::with_fill_factor(16, 0.0).is_err());
    /// # Ok::<(), fimap::Error>(())
    /// ```
    pub fn with_fill_factor(size_hint: usize, fill_factor: f64) -> Result<Self> {
        Ok(Self {
            map: IntMap::with_fill_factor(size_hint, fill_factor)?,
        })
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of buckets currently allocated.
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Removes every member, keeping the allocated buckets.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Adds `value` to the set, returning `true` if it was not already
    /// present.
    pub fn insert(&mut self, value: u64) -> bool {
        self.map.insert(value, ()).is_none()
    }

    /// Returns `true` if `value` is a member.
    pub fn contains(&self, value: u64) -> bool {
        self.map.contains_key(value)
    }

    /// Removes `value`, returning `true` if it was a member.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fimap::IntSet;
    /// #
    /// let mut set: IntSet = [0, 1, 2].into_iter().collect();
    /// assert!(set.remove(0));
    /// assert!(!set.remove(0));
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn remove(&mut self, value: u64) -> bool {
        self.map.remove(value).is_some()
    }

    /// Returns an iterator over the members in bucket order, with `0` last.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.map.keys(),
        }
    }
}

impl FromIterator<u64> for IntSet {
    fn from_iter<T: IntoIterator<Item = u64>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut set = IntSet::with_capacity(iter.size_hint().0);
        set.extend(iter);
        set
    }
}

impl Extend<u64> for IntSet {
    fn extend<T: IntoIterator<Item = u64>>(&mut self, iter: T) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a> IntoIterator for &'a IntSet {
    type IntoIter = Iter<'a>;
    type Item = u64;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the members of an [`IntSet`].
pub struct Iter<'a> {
    inner: Keys<'a, ()>,
}

impl Iterator for Iter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn test_insert_contains_remove() {
        let mut set = IntSet::new();
        assert!(set.is_empty());

        assert!(set.insert(0));
        assert!(set.insert(17));
        assert!(!set.insert(17));
        assert_eq!(set.len(), 2);

        assert!(set.contains(0));
        assert!(set.contains(17));
        assert!(!set.contains(18));

        assert!(set.remove(17));
        assert!(!set.remove(17));
        assert!(!set.contains(17));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_invalid_fill_factor() {
        assert!(IntSet::with_fill_factor(10, 1.0).is_err());
        assert!(IntSet::with_fill_factor(10, 0.25).is_ok());
    }

    #[test]
    fn test_equality_ignores_layout() {
        let a: IntSet = (0..100u64).collect();
        let mut b = IntSet::with_fill_factor(1000, 0.1).unwrap();
        b.extend((0..100u64).rev());

        assert_ne!(a.capacity(), b.capacity());
        assert_eq!(a, b);

        b.remove(50);
        assert_ne!(a, b);
    }

    #[test]
    fn test_clear_and_clone() {
        let mut set: IntSet = (0..500u64).collect();
        let snapshot = set.clone();
        let capacity = set.capacity();

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), capacity);
        assert_eq!(snapshot.len(), 500);
        assert!(snapshot.contains(0));
        assert!(snapshot.contains(499));
    }

    #[test]
    fn test_iter_yields_every_member() {
        let set: IntSet = [5, 0, 9, 1 << 40].into_iter().collect();
        assert_eq!(set.iter().len(), 4);
        assert_eq!(set.iter().last(), Some(0));

        let mut members: Vec<u64> = (&set).into_iter().collect();
        members.sort_unstable();
        assert_eq!(members, [0, 5, 9, 1 << 40]);
    }
}
