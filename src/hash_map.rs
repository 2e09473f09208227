use core::fmt::Debug;
use core::marker::PhantomData;

use crate::error::Error;
use crate::hash_table::HashTable;
use crate::hash_table::Stored;
use crate::layout::FixedLayout;
use crate::layout::encode;
use crate::span::Span;

/// A typed map over the byte [`HashTable`].
///
/// Keys and values are stored in their [`FixedLayout`] encodings, so the
/// underlying table is built with `K::STRIDE` and `V::STRIDE` strides and
/// equality is equality of the encoded bytes.
pub struct HashMap<K, V> {
    table: HashTable,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Clone for HashMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            _marker: PhantomData,
        }
    }
}

impl<K, V> Debug for HashMap<K, V>
where
    K: FixedLayout + Debug,
    V: FixedLayout + Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> HashMap<K, V>
where
    K: FixedLayout,
    V: FixedLayout,
{
    /// Creates an empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::HashMap;
    /// #
    /// let mut map: HashMap<u32, u64> = HashMap::new()?;
    /// assert_eq!(map.insert(&1, &10)?, None);
    /// assert_eq!(map.insert(&1, &11)?, Some(10));
    /// assert_eq!(map.get(&1)?, Some(11));
    /// # Ok::<(), probe_table::Error>(())
    /// ```
    pub fn new() -> Result<Self, Error> {
        Self::with_capacity(0)
    }

    /// Creates an empty map able to hold `capacity` entries without growing.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::with_capacity_and_strides(capacity, K::STRIDE, V::STRIDE)?,
            _marker: PhantomData,
        })
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all elements from the map, keeping its capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Makes room for `additional` more entries.
    pub fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.table.reserve(additional)
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    pub fn insert(&mut self, key: &K, value: &V) -> Result<Option<V>, Error> {
        let key = encode(key);
        let value = encode(value);
        let stored = self.table.upsert(
            Span::with_stride(&key, K::STRIDE)?,
            Span::with_stride(&value, V::STRIDE)?,
        )?;
        Ok(match stored {
            Stored::Inserted => None,
            Stored::Replaced(previous) => previous.and_then(|bytes| V::read_bytes(&bytes)),
        })
    }

    /// Returns a copy of the value stored for `key`.
    pub fn get(&self, key: &K) -> Result<Option<V>, Error> {
        let key = encode(key);
        Ok(self
            .table
            .get(Span::with_stride(&key, K::STRIDE)?)?
            .and_then(decode))
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        let key = encode(key);
        Span::with_stride(&key, K::STRIDE).is_ok_and(|key| self.table.contains(key))
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Result<Option<V>, Error> {
        let key = encode(key);
        let removed = self.table.remove(Span::with_stride(&key, K::STRIDE)?)?;
        Ok(removed.and_then(|entry| entry.value().and_then(V::read_bytes)))
    }

    /// Returns an iterator over decoded key-value pairs in an unspecified
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (K, V)> + '_ {
        self.table.iter().filter_map(|entry| {
            Some((
                K::read_bytes(entry.key())?,
                V::read_bytes(entry.value()?)?,
            ))
        })
    }

    /// Returns an iterator over decoded keys.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.table
            .iter()
            .filter_map(|entry| K::read_bytes(entry.key()))
    }

    /// Returns an iterator over decoded values.
    pub fn values(&self) -> impl Iterator<Item = V> + '_ {
        self.table
            .iter()
            .filter_map(|entry| V::read_bytes(entry.value()?))
    }

    /// The underlying byte table.
    pub fn as_table(&self) -> &HashTable {
        &self.table
    }
}

fn decode<V: FixedLayout>(span: Span<'_>) -> Option<V> {
    V::read_bytes(span.as_bytes())
}
