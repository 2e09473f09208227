//! The byte-keyed open-addressing table.
//!
//! Keys and values are copied out of caller-provided [`Span`]s into owned
//! buffers. Collisions are resolved by linear probing. Removed entries leave a
//! tombstone behind only when a later entry's probe chain may run through
//! them; tombstones are reclaimed when the table grows.
//!
//! The table is single-threaded. Mutating methods take `&mut self`, and the
//! spans returned by [`HashTable::get`] borrow the table, so a view can never
//! outlive the next mutation. Slots are addressed by index internally and a
//! rehash moves every entry; callers re-resolve entries by key.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::num::NonZeroUsize;

use crate::error::Error;
use crate::hash::fnv1a;
use crate::span::Span;
use crate::store::Store;

/// Smallest number of slots a table ever holds.
pub const MIN_CAPACITY: usize = 8;

/// Occupied plus tombstone slots may fill at most 3/4 of the table.
#[inline(always)]
fn within_load(used: usize, capacity: usize) -> bool {
    (used as u128 * 4) <= (capacity as u128 * 3)
}

/// Doubles `capacity` until `used` slots fit under the load limit.
#[inline]
fn grown_capacity(mut capacity: usize, used: usize) -> Result<usize, Error> {
    while !within_load(used, capacity) {
        capacity = capacity.checked_mul(2).ok_or(Error::CapacityOverflow)?;
    }
    Ok(capacity)
}

/// A live key/value pair owned by a [`HashTable`].
///
/// A removed entry is handed back to the caller; dropping it releases its
/// buffers.
#[derive(Clone, PartialEq, Eq)]
pub struct Entry {
    key: Box<[u8]>,
    value: Option<Box<[u8]>>,
    hash: u32,
}

impl Entry {
    fn new(key: Span<'_>, value: Span<'_>, hash: u32) -> Self {
        Entry {
            key: key.as_bytes().into(),
            value: owned_value(value),
            hash,
        }
    }

    /// The key bytes.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The value bytes, or `None` for a key stored without a value.
    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// The cached FNV-1a hash of the key.
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Splits the entry into its owned key and value buffers.
    pub fn into_parts(self) -> (Box<[u8]>, Option<Box<[u8]>>) {
        (self.key, self.value)
    }
}

impl Debug for Entry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("hash", &format_args!("{:#010x}", self.hash))
            .finish()
    }
}

#[inline]
fn owned_value(value: Span<'_>) -> Option<Box<[u8]>> {
    (!value.is_empty()).then(|| value.as_bytes().into())
}

#[derive(Clone, Debug, Default)]
enum Slot {
    #[default]
    Empty,
    Occupied(Entry),
    Tombstone,
}

/// What [`HashTable::upsert`] did with the key.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Stored {
    Inserted,
    /// The key was present; this is its previous value.
    Replaced(Option<Box<[u8]>>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Probe {
    /// The key lives at this index.
    Found(usize),
    /// The key is absent; this is the first empty slot on its probe chain.
    Vacant(usize),
}

/// Walks the probe chain of `key` in `slots`.
///
/// Tombstones and mismatching entries are stepped over; only an empty slot
/// ends the chain. `slots.len()` must be a power of two.
fn find_or_spot(slots: &Store<Slot>, key: &[u8], hash: u32) -> Result<Probe, Error> {
    let capacity = slots.len();
    debug_assert!(capacity.is_power_of_two());
    let mask = capacity.wrapping_sub(1);
    let start = hash as usize & mask;

    for step in 0..capacity {
        let index = start.wrapping_add(step) & mask;
        match &slots[index] {
            Slot::Empty => return Ok(Probe::Vacant(index)),
            Slot::Occupied(entry) if entry.hash == hash && *entry.key == *key => {
                return Ok(Probe::Found(index));
            }
            Slot::Occupied(_) | Slot::Tombstone => {}
        }
    }

    Err(Error::TableFull { capacity })
}

/// Index of the first empty slot on the probe chain starting at the home
/// slot of `hash`.
///
/// Only used to place entries into a store being rebuilt: keys are known to
/// be distinct and the store is never full, so no comparison is needed and
/// the walk always ends.
fn first_empty(slots: &Store<Slot>, hash: u32) -> usize {
    let mask = slots.len().wrapping_sub(1);
    let mut index = hash as usize & mask;
    while !matches!(slots[index], Slot::Empty) {
        index = (index + 1) & mask;
    }
    index
}

#[inline]
fn check_stride(expected: NonZeroUsize, span: Span<'_>) -> Result<(), Error> {
    if span.stride() != expected.get() {
        return Err(Error::StrideMismatch {
            expected: expected.get(),
            actual: span.stride(),
        });
    }
    Ok(())
}

/// An open-addressing hash table from byte keys to optional byte values.
///
/// Keys are hashed with 32-bit FNV-1a and compared byte for byte. The slot
/// count is always a power of two, at least [`MIN_CAPACITY`], and the table
/// doubles whenever live entries plus tombstones would exceed 3/4 of it. The
/// table never shrinks.
///
/// Every operation that can fail returns a `Result`. Looking up or removing a
/// missing key is not a failure and yields `Ok(None)`.
///
/// ## Example
///
/// ```rust
/// # use probe_table::HashTable;
/// #
/// let mut table = HashTable::new()?;
/// table.set("a", "1")?;
/// table.set("b", "2")?;
///
/// assert_eq!(table.get("a")?.unwrap(), *b"1");
/// assert!(table.remove("b")?.is_some());
/// assert!(table.get("b")?.is_none());
/// assert_eq!(table.len(), 1);
/// # Ok::<(), probe_table::Error>(())
/// ```
#[derive(Clone)]
pub struct HashTable {
    slots: Store<Slot>,
    count: usize,
    tombstones: usize,
    key_stride: NonZeroUsize,
    value_stride: NonZeroUsize,
}

impl Debug for HashTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let map = self
            .slots
            .iter()
            .map(|slot| match slot {
                Slot::Empty => '.',
                Slot::Occupied(_) => 'o',
                Slot::Tombstone => 'x',
            })
            .collect::<Vec<char>>();

        f.debug_struct("HashTable")
            .field(
                "slots",
                &map.chunks(16)
                    .map(|row| row.iter().collect::<String>())
                    .collect::<Vec<_>>(),
            )
            .field("count", &self.count)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl HashTable {
    /// Creates an empty table of [`MIN_CAPACITY`] slots that accepts keys and
    /// values of any byte length.
    pub fn new() -> Result<Self, Error> {
        Self::with_capacity(0)
    }

    /// Creates an empty table able to hold `capacity` entries without
    /// growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::HashTable;
    /// #
    /// let table = HashTable::with_capacity(100)?;
    /// assert_eq!(table.capacity(), 256);
    /// # Ok::<(), probe_table::Error>(())
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::with_capacity_and_strides(capacity, 1, 1)
    }

    /// Creates an empty table that only accepts keys made of `key_stride`
    /// byte elements and values made of `value_stride` byte elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::{Error, HashTable, Span};
    /// #
    /// let mut table = HashTable::with_strides(4, 8)?;
    /// let key = 7u32.to_le_bytes();
    /// let value = 9u64.to_le_bytes();
    /// table.set(Span::with_stride(&key, 4)?, Span::with_stride(&value, 8)?)?;
    ///
    /// // Plain byte spans carry a stride of one.
    /// assert_eq!(
    ///     table.get(&key),
    ///     Err(Error::StrideMismatch { expected: 4, actual: 1 })
    /// );
    /// # Ok::<(), probe_table::Error>(())
    /// ```
    pub fn with_strides(key_stride: usize, value_stride: usize) -> Result<Self, Error> {
        Self::with_capacity_and_strides(0, key_stride, value_stride)
    }

    /// Creates an empty table with both an initial capacity and element
    /// strides. See [`with_capacity`](Self::with_capacity) and
    /// [`with_strides`](Self::with_strides).
    pub fn with_capacity_and_strides(
        capacity: usize,
        key_stride: usize,
        value_stride: usize,
    ) -> Result<Self, Error> {
        let key_stride = NonZeroUsize::new(key_stride).ok_or(Error::ZeroStride)?;
        let value_stride = NonZeroUsize::new(value_stride).ok_or(Error::ZeroStride)?;
        let slots = grown_capacity(MIN_CAPACITY, capacity)?;

        Ok(Self {
            slots: Store::with_slots(slots)?,
            count: 0,
            tombstones: 0,
            key_stride,
            value_stride,
        })
    }

    /// Releases every entry and the backing store.
    ///
    /// Dropping the table does the same; this spells it out at call sites
    /// that want the release to be visible.
    pub fn destroy(self) {
        drop(self);
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of slots in the backing store.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of tombstone slots awaiting the next rehash.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Fraction of slots that are occupied or tombstoned.
    pub fn load_factor(&self) -> f64 {
        (self.count + self.tombstones) as f64 / self.capacity() as f64
    }

    /// Element stride accepted for keys.
    pub fn key_stride(&self) -> usize {
        self.key_stride.get()
    }

    /// Element stride accepted for values.
    pub fn value_stride(&self) -> usize {
        self.value_stride.get()
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    fn check_key(&self, key: Span<'_>) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        check_stride(self.key_stride, key)
    }

    /// Looks up `key` and returns a view of its value.
    ///
    /// A key stored without a value yields an empty span. The span borrows
    /// the table and is valid until the next mutating call.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::HashTable;
    /// #
    /// let mut table = HashTable::new()?;
    /// table.set("present", "")?;
    ///
    /// assert!(table.get("present")?.unwrap().is_empty());
    /// assert!(table.get("absent")?.is_none());
    /// # Ok::<(), probe_table::Error>(())
    /// ```
    pub fn get<'k>(&self, key: impl Into<Span<'k>>) -> Result<Option<Span<'_>>, Error> {
        let key = key.into();
        self.check_key(key)?;

        let hash = fnv1a(key.as_bytes());
        match find_or_spot(&self.slots, key.as_bytes(), hash)? {
            Probe::Found(index) => match &self.slots[index] {
                Slot::Occupied(entry) => Ok(Some(self.value_span(entry))),
                Slot::Empty | Slot::Tombstone => Ok(None),
            },
            Probe::Vacant(_) => Ok(None),
        }
    }

    fn value_span<'a>(&self, entry: &'a Entry) -> Span<'a> {
        match &entry.value {
            Some(value) => Span::from_parts(value, self.value_stride),
            None => Span::empty(self.value_stride),
        }
    }

    /// Returns `true` if `key` has an entry. Invalid keys are never present.
    pub fn contains<'k>(&self, key: impl Into<Span<'k>>) -> bool {
        matches!(self.get(key), Ok(Some(_)))
    }

    /// Inserts `key` with `value`, or replaces the value of an existing key.
    ///
    /// An empty `value` stores the key without a value. Returns `true` if a
    /// new entry was created and `false` if an existing one was updated.
    ///
    /// Inserting may double the table. If that growth cannot allocate, the
    /// insertion is undone and the table is left as it was before the call.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::HashTable;
    /// #
    /// let mut table = HashTable::new()?;
    /// assert!(table.set("k", "v1")?);
    /// assert!(!table.set("k", "v2")?);
    /// assert_eq!(table.get("k")?.unwrap(), *b"v2");
    /// assert_eq!(table.len(), 1);
    /// # Ok::<(), probe_table::Error>(())
    /// ```
    pub fn set<'k, 'v>(
        &mut self,
        key: impl Into<Span<'k>>,
        value: impl Into<Span<'v>>,
    ) -> Result<bool, Error> {
        let stored = self.upsert(key.into(), value.into())?;
        Ok(matches!(stored, Stored::Inserted))
    }

    /// Inserts or updates `key`, handing back the value buffer it replaced.
    pub(crate) fn upsert(&mut self, key: Span<'_>, value: Span<'_>) -> Result<Stored, Error> {
        self.check_key(key)?;
        check_stride(self.value_stride, value)?;

        let hash = fnv1a(key.as_bytes());
        match find_or_spot(&self.slots, key.as_bytes(), hash)? {
            Probe::Found(index) => {
                let previous = match &mut self.slots[index] {
                    Slot::Occupied(entry) => {
                        core::mem::replace(&mut entry.value, owned_value(value))
                    }
                    Slot::Empty | Slot::Tombstone => None,
                };
                Ok(Stored::Replaced(previous))
            }
            Probe::Vacant(index) => {
                self.slots[index] = Slot::Occupied(Entry::new(key, value, hash));
                self.count += 1;
                self.grow_after_insert(index)?;
                Ok(Stored::Inserted)
            }
        }
    }

    /// Removes `key` and returns its entry.
    ///
    /// The vacated slot becomes a tombstone if the slot after it is in use,
    /// since an entry further along may have probed past this one. Otherwise
    /// no chain runs through it and it goes straight back to empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::HashTable;
    /// #
    /// let mut table = HashTable::new()?;
    /// table.set("k", "v")?;
    ///
    /// let entry = table.remove("k")?.unwrap();
    /// assert_eq!(entry.value(), Some(&b"v"[..]));
    /// assert!(table.remove("k")?.is_none());
    /// # Ok::<(), probe_table::Error>(())
    /// ```
    pub fn remove<'k>(&mut self, key: impl Into<Span<'k>>) -> Result<Option<Entry>, Error> {
        let key = key.into();
        self.check_key(key)?;

        let hash = fnv1a(key.as_bytes());
        let Probe::Found(index) = find_or_spot(&self.slots, key.as_bytes(), hash)? else {
            return Ok(None);
        };

        let successor_empty = matches!(self.slots[(index + 1) & self.mask()], Slot::Empty);
        let Slot::Occupied(entry) = core::mem::take(&mut self.slots[index]) else {
            return Ok(None);
        };
        self.count -= 1;

        if !successor_empty {
            self.slots[index] = Slot::Tombstone;
            self.tombstones += 1;
        }

        Ok(Some(entry))
    }

    /// Makes room for at least `additional` more insertions without growing.
    ///
    /// Tombstones count against the room, so this may rehash even when the
    /// capacity already looks sufficient.
    pub fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        let used = (self.count + self.tombstones)
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow)?;
        if let Some(fresh) = self.grown_store(used)? {
            self.rehash_into(fresh);
        }
        Ok(())
    }

    /// Removes all entries, keeping the current capacity.
    pub fn clear(&mut self) {
        self.slots.zero_fill();
        self.count = 0;
        self.tombstones = 0;
    }

    /// Returns an iterator over the live entries in an unspecified order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.count,
        }
    }

    /// Removes every entry, yielding each one.
    ///
    /// The table is empty once the iterator is dropped, whether or not it was
    /// run to completion. A yielded entry leaves a tombstone until then, so a
    /// leaked iterator leaves a consistent table holding the entries it did
    /// not yield.
    pub fn drain(&mut self) -> Drain<'_> {
        Drain {
            table: self,
            index: 0,
        }
    }

    /// Grows after an insertion at `index`, undoing the insertion if the new
    /// store cannot be allocated.
    fn grow_after_insert(&mut self, index: usize) -> Result<(), Error> {
        let fresh = match self.grown_store(self.count + self.tombstones) {
            Ok(Some(fresh)) => fresh,
            Ok(None) => return Ok(()),
            Err(err) => {
                self.slots[index] = Slot::Empty;
                self.count -= 1;
                return Err(err);
            }
        };
        self.rehash_into(fresh);
        Ok(())
    }

    /// Allocates the store a table with `used` slots in use should grow
    /// into, or `None` if the current one is large enough.
    fn grown_store(&self, used: usize) -> Result<Option<Store<Slot>>, Error> {
        let capacity = grown_capacity(self.capacity(), used)?;
        if capacity == self.capacity() {
            return Ok(None);
        }
        Store::with_slots(capacity).map(Some)
    }

    #[cold]
    fn rehash_into(&mut self, fresh: Store<Slot>) {
        let old = core::mem::replace(&mut self.slots, fresh);
        let old_capacity = old.len();
        let live = self.count;
        let reclaimed = self.tombstones;

        // Entries are moved, not copied. Tombstones are dropped on the floor.
        self.count = 0;
        self.tombstones = 0;
        for slot in old {
            if let Slot::Occupied(entry) = slot {
                let index = first_empty(&self.slots, entry.hash);
                self.slots[index] = Slot::Occupied(entry);
                self.count += 1;
            }
        }
        debug_assert_eq!(self.count, live);

        log::trace!(
            "rehashed {} -> {} slots, moved {} entries, reclaimed {} tombstones",
            old_capacity,
            self.capacity(),
            self.count,
            reclaimed
        );
    }

    /// Computes a histogram of probe distances for the live entries.
    ///
    /// Bin `n` counts the entries that sit `n` slots past their home slot.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> crate::stats::ProbeHistogram {
        let mut bins: Vec<usize> = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied(entry) = slot {
                let distance = index.wrapping_sub(entry.hash as usize) & self.mask();
                if bins.len() <= distance {
                    bins.resize(distance + 1, 0);
                }
                bins[distance] += 1;
            }
        }

        crate::stats::ProbeHistogram { bins }
    }

    /// Returns occupancy and memory statistics for debugging.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> crate::stats::DebugStats {
        let histogram = self.probe_histogram();
        let payload_bytes = self
            .iter()
            .map(|entry| entry.key.len() + entry.value.as_ref().map_or(0, |v| v.len()))
            .sum::<usize>();

        crate::stats::DebugStats {
            populated: self.count,
            tombstones: self.tombstones,
            capacity: self.capacity(),
            load_factor: self.load_factor(),
            max_probe: histogram.max_distance(),
            mean_probe: histogram.mean_distance(),
            slot_bytes: self.capacity() * core::mem::size_of::<Slot>(),
            payload_bytes,
        }
    }
}

/// An iterator over the entries of a [`HashTable`].
///
/// Created by [`HashTable::iter`].
pub struct Iter<'a> {
    slots: core::slice::Iter<'a, Slot>,
    remaining: usize,
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(entry) = slot {
                self.remaining -= 1;
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// A draining iterator over the entries of a [`HashTable`].
///
/// Created by [`HashTable::drain`].
pub struct Drain<'a> {
    table: &'a mut HashTable,
    index: usize,
}

impl ExactSizeIterator for Drain<'_> {}

impl Iterator for Drain<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.table.capacity() {
            let slot = &mut self.table.slots[self.index];
            self.index += 1;
            match core::mem::replace(slot, Slot::Tombstone) {
                Slot::Occupied(entry) => {
                    self.table.count -= 1;
                    self.table.tombstones += 1;
                    return Some(entry);
                }
                other => *slot = other,
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.count, Some(self.table.count))
    }
}

impl Drop for Drain<'_> {
    fn drop(&mut self) {
        self.table.clear();
    }
}
