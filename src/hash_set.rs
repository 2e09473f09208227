use core::fmt::Debug;
use core::marker::PhantomData;

use crate::error::Error;
use crate::hash_table::HashTable;
use crate::layout::FixedLayout;
use crate::layout::encode;
use crate::span::Span;

/// A typed set over the byte [`HashTable`].
///
/// Members are stored as keys with no value.
pub struct HashSet<T> {
    table: HashTable,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for HashSet<T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Debug for HashSet<T>
where
    T: FixedLayout + Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: FixedLayout> HashSet<T> {
    /// Creates an empty set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::HashSet;
    /// #
    /// let mut set: HashSet<u64> = HashSet::new()?;
    /// assert!(set.insert(&42)?);
    /// assert!(!set.insert(&42)?);
    /// assert!(set.contains(&42));
    /// # Ok::<(), probe_table::Error>(())
    /// ```
    pub fn new() -> Result<Self, Error> {
        Self::with_capacity(0)
    }

    /// Creates an empty set able to hold `capacity` members without growing.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::with_capacity_and_strides(capacity, T::STRIDE, 1)?,
            _marker: PhantomData,
        })
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes every member, keeping the capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Adds `value`, returning `true` if it was not already a member.
    pub fn insert(&mut self, value: &T) -> Result<bool, Error> {
        let key = encode(value);
        self.table
            .set(Span::with_stride(&key, T::STRIDE)?, Span::new(&[]))
    }

    /// Returns `true` if `value` is a member.
    pub fn contains(&self, value: &T) -> bool {
        let key = encode(value);
        Span::with_stride(&key, T::STRIDE).is_ok_and(|key| self.table.contains(key))
    }

    /// Removes `value`, returning `true` if it was a member.
    pub fn remove(&mut self, value: &T) -> Result<bool, Error> {
        let key = encode(value);
        Ok(self
            .table
            .remove(Span::with_stride(&key, T::STRIDE)?)?
            .is_some())
    }

    /// Returns an iterator over decoded members in an unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.table
            .iter()
            .filter_map(|entry| T::read_bytes(entry.key()))
    }
}

impl<T: FixedLayout> PartialEq for HashSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(&v))
    }
}

impl<T: FixedLayout> Eq for HashSet<T> {}
