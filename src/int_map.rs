use alloc::boxed::Box;
use alloc::vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::mem::MaybeUninit;

use crate::error::Error;
use crate::error::Result;

/// 32-bit golden-ratio multiplier used to scramble keys before masking.
const PHI: u64 = 0x9E37_79B9;

/// Key value marking an empty bucket.
///
/// A present `FREE_KEY` entry can't live in the bucket arrays, so it is kept
/// in the out-of-band `free_value` slot instead.
const FREE_KEY: u64 = 0;

/// Smallest bucket array the map will ever allocate or shrink to.
const MIN_BUCKETS: usize = 2;

// `density-seventy-five` is on by default, so the other densities are
// checked first and win whenever they are enabled.
cfg_if::cfg_if! {
    if #[cfg(feature = "density-fifty")] {
        /// Fill factor used by the infallible constructors.
        pub const DEFAULT_FILL_FACTOR: f64 = 0.5;
    } else if #[cfg(feature = "density-ninety")] {
        /// Fill factor used by the infallible constructors.
        pub const DEFAULT_FILL_FACTOR: f64 = 0.9;
    } else {
        /// Fill factor used by the infallible constructors.
        pub const DEFAULT_FILL_FACTOR: f64 = 0.75;
    }
}

#[inline(always)]
fn phi_mix(key: u64) -> u64 {
    let h = key.wrapping_mul(PHI);
    h ^ (h >> 16)
}

/// Number of buckets needed to hold `size_hint` entries at `fill_factor`.
fn bucket_count(size_hint: usize, fill_factor: f64) -> Option<usize> {
    let wanted = (size_hint.max(1) as f64 / fill_factor).ceil();
    if wanted >= usize::MAX as f64 {
        return None;
    }

    (wanted as usize)
        .checked_next_power_of_two()
        .map(|buckets| buckets.max(MIN_BUCKETS))
}

#[inline(always)]
fn threshold_for(buckets: usize, fill_factor: f64) -> usize {
    (buckets as f64 * fill_factor).floor() as usize
}

fn alloc_buckets<V>(buckets: usize) -> (Box<[u64]>, Box<[MaybeUninit<V>]>) {
    (
        vec![FREE_KEY; buckets].into_boxed_slice(),
        Box::new_uninit_slice(buckets),
    )
}

/// Walks the probe sequence of `key` and returns the first bucket that is
/// either empty or holds `key`.
///
/// Terminates because the fill threshold always leaves at least one empty
/// bucket.
#[inline(always)]
fn locate(keys: &[u64], mask: usize, key: u64) -> usize {
    debug_assert_ne!(key, FREE_KEY);
    debug_assert_eq!(keys.len(), mask + 1);

    let mut index = phi_mix(key) as usize & mask;
    loop {
        // SAFETY: `index` is always masked by `mask`, which is `keys.len() - 1`.
        let found = unsafe { *keys.get_unchecked(index) };
        if found == key || found == FREE_KEY {
            return index;
        }
        index = (index + 1) & mask;
    }
}

/// Writes `key`/`value` into the given arrays. Returns the previous value
/// when `key` was already present.
#[inline(always)]
fn store<V>(
    keys: &mut [u64],
    values: &mut [MaybeUninit<V>],
    mask: usize,
    key: u64,
    value: V,
) -> Option<V> {
    let index = locate(keys, mask, key);
    if keys[index] == key {
        // SAFETY: The bucket holds a non-free key, so its value slot is
        // initialized.
        let slot = unsafe { values[index].assume_init_mut() };
        return Some(core::mem::replace(slot, value));
    }

    values[index].write(value);
    keys[index] = key;
    None
}

/// An open-addressed map from `u64` keys to values of type `V`.
///
/// Keys are scrambled with a golden-ratio multiply and placed by linear
/// probing into a power-of-two bucket array. Deletion closes holes by shifting
/// later entries backward, so no tombstones are ever left behind and lookups
/// stop at the first empty bucket.
///
/// The key `0` marks empty buckets internally; when present it is stored in a
/// dedicated slot, which is invisible to callers.
///
/// ## Resizing
///
/// - The bucket array doubles when an insertion pushes [`len`] above
///   [`threshold`].
/// - It halves after a removal that leaves [`len`] below half of
///   [`threshold`], never going below 2 buckets.
///
/// Both are full rehashes into freshly allocated arrays.
///
/// [`len`]: IntMap::len
/// [`threshold`]: IntMap::threshold
///
/// ## Example
///
/// ```rust
/// use fimap::IntMap;
///
/// let mut map = IntMap::with_fill_factor(1000, 0.5)?;
/// map.insert(123, "a");
/// map.insert(0, "zero");
///
/// assert_eq!(map.get(123), Some(&"a"));
/// assert_eq!(map.get(0), Some(&"zero"));
/// assert_eq!(map.get(999), None);
/// assert_eq!(map.len(), 2);
/// # Ok::<(), fimap::Error>(())
/// ```
pub struct IntMap<V> {
    keys: Box<[u64]>,
    values: Box<[MaybeUninit<V>]>,

    free_value: Option<V>,

    fill_factor: f64,
    threshold: usize,
    len: usize,
    mask: usize,
}

impl<V> Debug for IntMap<V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> Clone for IntMap<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        let (keys, values) = alloc_buckets::<V>(self.keys.len());
        let mut map = IntMap {
            keys,
            values,
            free_value: self.free_value.clone(),
            fill_factor: self.fill_factor,
            threshold: self.threshold,
            len: self.len,
            mask: self.mask,
        };

        for (index, &key) in self.keys.iter().enumerate() {
            if key != FREE_KEY {
                // SAFETY: The source bucket holds a non-free key, so its value is
                // initialized.
                let value = unsafe { self.values[index].assume_init_ref() }.clone();
                map.values[index].write(value);
                // Publish the key only after the value is written so a panicking
                // `clone` never leaves an occupied bucket without a value.
                map.keys[index] = key;
            }
        }

        map
    }
}

impl<V> Drop for IntMap<V> {
    fn drop(&mut self) {
        if core::mem::needs_drop::<V>() {
            for (key, value) in self.keys.iter().zip(self.values.iter_mut()) {
                if *key != FREE_KEY {
                    // SAFETY: Occupied buckets always hold an initialized value, and
                    // the map is never touched again after drop.
                    unsafe { value.assume_init_drop() };
                }
            }
        }
    }
}

impl<V> Default for IntMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> IntMap<V> {
    /// Creates an empty map using [`DEFAULT_FILL_FACTOR`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fimap::IntMap;
    /// #
    /// let map: IntMap<String> = IntMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 2);
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty map sized for `size_hint` entries at
    /// [`DEFAULT_FILL_FACTOR`].
    ///
    /// # Panics
    ///
    /// Panics if the bucket count needed for `size_hint` overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fimap::IntMap;
    /// #
    /// let map: IntMap<u32> = IntMap::with_capacity(100);
    /// assert!(map.capacity() >= 100);
    /// ```
    pub fn with_capacity(size_hint: usize) -> Self {
        match Self::with_fill_factor(size_hint, DEFAULT_FILL_FACTOR) {
            Ok(map) => map,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates an empty map sized for `size_hint` entries, growing whenever
    /// the number of entries exceeds `capacity * fill_factor`.
    ///
    /// A `size_hint` of 0 is treated as 1. The bucket count is the next power
    /// of two at or above `ceil(size_hint / fill_factor)`, and at least 2.
    ///
    /// The first growth threshold is computed from half the initial bucket
    /// count, so a freshly built map grows once it is filled to
    /// `fill_factor / 2`. Every later resize uses the full bucket count.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] if `fill_factor` is not strictly
    ///   between 0 and 1.
    /// - [`Error::CapacityOverflow`] if the bucket count overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fimap::Error;
    /// # use fimap::IntMap;
    /// #
    /// let map: IntMap<&str> = IntMap::with_fill_factor(1000, 0.5)?;
    /// assert_eq!(map.capacity(), 2048);
    ///
    /// assert_eq!(
    ///     IntMap::<&str>::with_fill_factor(1000, 1.0).unwrap_err(),
    ///     Error::InvalidConfiguration(1.0)
    /// );
    /// # Ok::<(), Error>(())
    /// ```
    pub fn with_fill_factor(size_hint: usize, fill_factor: f64) -> Result<Self> {
        if !(fill_factor > 0.0 && fill_factor < 1.0) {
            return Err(Error::InvalidConfiguration(fill_factor));
        }

        let buckets =
            bucket_count(size_hint, fill_factor).ok_or(Error::CapacityOverflow(size_hint))?;
        let (keys, values) = alloc_buckets::<V>(buckets);

        Ok(IntMap {
            keys,
            values,
            free_value: None,
            fill_factor,
            threshold: threshold_for(buckets >> 1, fill_factor),
            len: 0,
            mask: buckets - 1,
        })
    }

    /// Returns the number of entries in the map, including key `0`.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets currently allocated.
    ///
    /// This is always a power of two, at least 2, and strictly greater than
    /// the number of entries stored in the bucket arrays.
    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    /// Returns the fill factor this map was built with.
    pub fn fill_factor(&self) -> f64 {
        self.fill_factor
    }

    /// Returns the entry count above which the next insertion grows the map.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    #[inline(always)]
    fn probe_start(&self, key: u64) -> usize {
        phi_mix(key) as usize & self.mask
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fimap::IntMap;
    /// #
    /// let mut map = IntMap::new();
    /// map.insert(7, "seven");
    /// assert_eq!(map.get(7), Some(&"seven"));
    /// assert_eq!(map.get(8), None);
    /// ```
    pub fn get(&self, key: u64) -> Option<&V> {
        if key == FREE_KEY {
            return self.free_value.as_ref();
        }

        let index = locate(&self.keys, self.mask, key);
        if self.keys[index] == key {
            // SAFETY: The bucket holds a non-free key, so its value is initialized.
            Some(unsafe { self.values[index].assume_init_ref() })
        } else {
            None
        }
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fimap::IntMap;
    /// #
    /// let mut map = IntMap::new();
    /// map.insert(7, 1);
    /// if let Some(value) = map.get_mut(7) {
    ///     *value += 1;
    /// }
    /// assert_eq!(map.get(7), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: u64) -> Option<&mut V> {
        if key == FREE_KEY {
            return self.free_value.as_mut();
        }

        let index = locate(&self.keys, self.mask, key);
        if self.keys[index] == key {
            // SAFETY: The bucket holds a non-free key, so its value is initialized.
            Some(unsafe { self.values[index].assume_init_mut() })
        } else {
            None
        }
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: u64) -> bool {
        self.get(key).is_some()
    }

    /// Inserts `value` for `key`, returning the value it replaced.
    ///
    /// Overwriting an existing key never resizes. Inserting key `0` never
    /// resizes either, since it doesn't occupy a bucket.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fimap::IntMap;
    /// #
    /// let mut map = IntMap::new();
    /// assert_eq!(map.insert(1, "a"), None);
    /// assert_eq!(map.insert(1, "b"), Some("a"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: u64, value: V) -> Option<V> {
        if key == FREE_KEY {
            let previous = self.free_value.replace(value);
            if previous.is_none() {
                self.len += 1;
            }
            return previous;
        }

        let previous = store(&mut self.keys, &mut self.values, self.mask, key, value);
        if previous.is_none() {
            self.len += 1;
            if self.len > self.threshold {
                self.grow();
            }
        }
        previous
    }

    /// Removes `key` from the map, returning its value if it was present.
    ///
    /// Entries following the removed one in its probe run are shifted back to
    /// close the hole, and the map shrinks if it has become sparse.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fimap::IntMap;
    /// #
    /// let mut map = IntMap::new();
    /// map.insert(42, "answer");
    ///
    /// assert_eq!(map.remove(42), Some("answer"));
    /// assert_eq!(map.remove(42), None);
    /// assert!(map.is_empty());
    /// ```
    pub fn remove(&mut self, key: u64) -> Option<V> {
        if key == FREE_KEY {
            let value = self.free_value.take();
            if value.is_some() {
                self.len -= 1;
            }
            return value;
        }

        let index = locate(&self.keys, self.mask, key);
        if self.keys[index] == FREE_KEY {
            return None;
        }

        self.len -= 1;
        let start = self.block_start(index);

        self.keys[index] = FREE_KEY;
        // SAFETY: The bucket held `key` until the line above, so its value is
        // initialized, and clearing the key first means it is read exactly once.
        let value = unsafe { self.values[index].assume_init_read() };

        self.close_hole(start, index);
        self.shrink();

        Some(value)
    }

    /// Returns the first bucket of the contiguous occupied run holding
    /// `index`.
    ///
    /// Every entry in a run has its probe start inside the run, so jumping to
    /// an entry's probe start skips ahead without leaving the run.
    fn block_start(&self, index: usize) -> usize {
        let mask = self.mask;
        let mut start = index;
        loop {
            let prev = start.wrapping_sub(1) & mask;
            let key = self.keys[prev];
            if key == FREE_KEY {
                return start;
            }

            let ideal = self.probe_start(key);
            start = if ideal != prev && self.keys[ideal] != FREE_KEY {
                ideal
            } else {
                prev
            };
        }
    }

    /// Backward-shift deletion: walks the run after the emptied `hole` and
    /// pulls back every entry whose probe start does not lie strictly between
    /// the hole and the entry itself.
    fn close_hole(&mut self, start: usize, mut hole: usize) {
        let mask = self.mask;
        let mut index = hole;
        loop {
            index = (index + 1) & mask;
            let key = self.keys[index];
            if key == FREE_KEY {
                return;
            }

            let ideal = self.probe_start(key);
            if ideal.wrapping_sub(start) & mask <= hole.wrapping_sub(start) & mask {
                self.keys[hole] = key;
                self.keys[index] = FREE_KEY;
                // Moving `MaybeUninit` slots is a plain bitwise swap; the value
                // travels with its key and the vacated slot is left logically
                // uninitialized.
                self.values.swap(hole, index);
                hole = index;
            }
        }
    }

    fn grow(&mut self) {
        let buckets = self
            .keys
            .len()
            .checked_mul(2)
            .expect("capacity overflow");
        self.rehash(buckets);
    }

    fn shrink(&mut self) {
        if self.len < self.threshold >> 1 && self.keys.len() > MIN_BUCKETS {
            self.rehash(self.keys.len() >> 1);
        }
    }

    /// Moves every bucket entry into freshly allocated arrays of `buckets`
    /// slots. The key `0` slot is untouched.
    fn rehash(&mut self, buckets: usize) {
        debug_assert!(buckets.is_power_of_two() && buckets >= MIN_BUCKETS);

        let (mut keys, mut values) = alloc_buckets::<V>(buckets);
        let mask = buckets - 1;

        for (index, &key) in self.keys.iter().enumerate() {
            if key != FREE_KEY {
                // SAFETY: Occupied buckets hold initialized values. The old value
                // array is replaced below and dropped as `MaybeUninit`, which never
                // runs `V`'s destructor, so each value is moved exactly once.
                let value = unsafe { self.values[index].assume_init_read() };
                let displaced = store(&mut keys, &mut values, mask, key, value);
                debug_assert!(displaced.is_none());
            }
        }

        self.keys = keys;
        self.values = values;
        self.mask = mask;
        self.threshold = threshold_for(buckets, self.fill_factor);
    }

    /// Removes every entry while keeping the bucket arrays allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fimap::IntMap;
    /// #
    /// let mut map = IntMap::with_capacity(100);
    /// map.insert(0, "zero");
    /// map.insert(1, "one");
    /// let capacity = map.capacity();
    ///
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.get(1), None);
    /// assert_eq!(map.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        let needs_drop = core::mem::needs_drop::<V>();
        for (key, value) in self.keys.iter_mut().zip(self.values.iter_mut()) {
            if core::mem::replace(key, FREE_KEY) != FREE_KEY && needs_drop {
                // SAFETY: The bucket was occupied, so its value is initialized, and
                // its key is already cleared so it is never dropped twice.
                unsafe { value.assume_init_drop() };
            }
        }

        self.free_value = None;
        self.len = 0;
    }

    /// Calls `f` on every entry, stopping at the first error and returning it.
    ///
    /// Entries are visited in bucket order, with key `0` visited last.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fimap::IntMap;
    /// #
    /// let mut map = IntMap::new();
    /// map.insert(0, 10);
    /// map.insert(1, 11);
    ///
    /// let mut sum = 0;
    /// map.try_for_each(|_, value| {
    ///     sum += *value;
    ///     Ok::<(), ()>(())
    /// })?;
    /// assert_eq!(sum, 21);
    ///
    /// let stopped = map.try_for_each(|key, _| Err(key));
    /// assert!(stopped.is_err());
    /// # Ok::<(), ()>(())
    /// ```
    pub fn try_for_each<E>(
        &self,
        mut f: impl FnMut(u64, &V) -> core::result::Result<(), E>,
    ) -> core::result::Result<(), E> {
        self.iter().try_for_each(|(key, value)| f(key, value))
    }

    /// Returns an iterator over `(key, &value)` pairs in bucket order, with
    /// key `0` last.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use fimap::IntMap;
    /// #
    /// let mut map = IntMap::new();
    /// map.insert(3, "c");
    /// map.insert(0, "zero");
    ///
    /// let entries: Vec<_> = map.iter().collect();
    /// assert_eq!(entries.len(), 2);
    /// assert_eq!(entries.last(), Some(&(0, &"zero")));
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            map: self,
            bucket_index: 0,
            free_visited: false,
            remaining: self.len,
        }
    }

    /// Returns an iterator over the keys, in the same order as [`iter`].
    ///
    /// [`iter`]: IntMap::iter
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values, in the same order as [`iter`].
    ///
    /// [`iter`]: IntMap::iter
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }
}

#[cfg(any(test, feature = "stats"))]
impl<V> IntMap<V> {
    fn probe_distance(&self, index: usize) -> usize {
        index.wrapping_sub(self.probe_start(self.keys[index])) & self.mask
    }

    /// Counts bucket entries by their distance from their probe start.
    ///
    /// Index `d` of the result holds the number of entries stored `d`
    /// buckets after the bucket their key hashes to. Key `0` is not counted.
    pub fn probe_histogram(&self) -> alloc::vec::Vec<usize> {
        let mut hist = alloc::vec::Vec::new();
        for index in 0..self.keys.len() {
            if self.keys[index] != FREE_KEY {
                let distance = self.probe_distance(index);
                if hist.len() <= distance {
                    hist.resize(distance + 1, 0);
                }
                hist[distance] += 1;
            }
        }
        hist
    }

    /// Pretty-prints [`probe_histogram`](IntMap::probe_histogram) as a
    /// horizontal bar chart on stdout.
    #[cfg(feature = "std")]
    pub fn print_probe_histogram(&self) {
        crate::stats::print_probe_histogram(&self.probe_histogram());
    }

    /// Returns occupancy and probe-length statistics for the current table.
    pub fn debug_stats(&self) -> crate::stats::DebugStats {
        let mut occupied_buckets = 0;
        let mut total_distance = 0;
        let mut max_probe_distance = 0;
        for index in 0..self.keys.len() {
            if self.keys[index] != FREE_KEY {
                let distance = self.probe_distance(index);
                occupied_buckets += 1;
                total_distance += distance;
                max_probe_distance = max_probe_distance.max(distance);
            }
        }

        crate::stats::DebugStats {
            len: self.len,
            buckets: self.keys.len(),
            occupied_buckets,
            threshold: self.threshold,
            load_factor: occupied_buckets as f64 / self.keys.len() as f64,
            max_probe_distance,
            mean_probe_distance: if occupied_buckets == 0 {
                0.0
            } else {
                total_distance as f64 / occupied_buckets as f64
            },
            total_bytes: self.keys.len()
                * (core::mem::size_of::<u64>() + core::mem::size_of::<MaybeUninit<V>>()),
        }
    }
}

#[cfg(test)]
impl<V> IntMap<V> {
    /// Checks the structural invariants of the table, panicking on violation.
    pub(crate) fn assert_invariants(&self) {
        let buckets = self.keys.len();
        assert!(buckets.is_power_of_two() && buckets >= MIN_BUCKETS);
        assert_eq!(self.values.len(), buckets);
        assert_eq!(self.mask, buckets - 1);

        let mut occupied = 0;
        for (index, &key) in self.keys.iter().enumerate() {
            if key == FREE_KEY {
                continue;
            }
            occupied += 1;

            // Every bucket between the probe start and the entry must be full,
            // otherwise a lookup would stop early.
            let mut probe = self.probe_start(key);
            while probe != index {
                assert_ne!(
                    self.keys[probe], FREE_KEY,
                    "gap at {probe} before key {key} stored at {index}"
                );
                assert_ne!(self.keys[probe], key, "duplicate key {key}");
                probe = (probe + 1) & self.mask;
            }
        }

        assert!(occupied < buckets, "no empty bucket left");
        assert_eq!(
            self.len,
            occupied + usize::from(self.free_value.is_some()),
            "len out of sync with occupied buckets"
        );
    }
}

impl<V> FromIterator<(u64, V)> for IntMap<V> {
    fn from_iter<T: IntoIterator<Item = (u64, V)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut map = IntMap::with_capacity(iter.size_hint().0);
        map.extend(iter);
        map
    }
}

impl<V> Extend<(u64, V)> for IntMap<V> {
    fn extend<T: IntoIterator<Item = (u64, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, V> IntoIterator for &'a IntMap<V> {
    type IntoIter = Iter<'a, V>;
    type Item = (u64, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of an [`IntMap`].
///
/// This struct is created by the [`iter`] method on [`IntMap`].
///
/// [`iter`]: IntMap::iter
pub struct Iter<'a, V> {
    map: &'a IntMap<V>,
    bucket_index: usize,
    free_visited: bool,
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            map: self.map,
            bucket_index: self.bucket_index,
            free_visited: self.free_visited,
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (u64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let map: &'a IntMap<V> = self.map;

        while self.bucket_index < map.keys.len() {
            let index = self.bucket_index;
            self.bucket_index += 1;

            let key = map.keys[index];
            if key != FREE_KEY {
                self.remaining -= 1;
                // SAFETY: The bucket holds a non-free key, so its value is
                // initialized, and the shared borrow keeps it alive for 'a.
                return Some((key, unsafe { map.values[index].assume_init_ref() }));
            }
        }

        if !self.free_visited {
            self.free_visited = true;
            if let Some(value) = map.free_value.as_ref() {
                self.remaining -= 1;
                return Some((FREE_KEY, value));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// An iterator over the keys of an [`IntMap`].
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<V> Iterator for Keys<'_, V> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

impl<V> FusedIterator for Keys<'_, V> {}

/// An iterator over the values of an [`IntMap`].
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

impl<V> FusedIterator for Values<'_, V> {}
