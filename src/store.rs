use alloc::vec::Vec;
use core::ops::Index;
use core::ops::IndexMut;

use crate::error::Error;

/// A growable, index-addressed buffer of fixed-size slots.
///
/// Fresh slots hold `T::default()`, the store's notion of a zeroed slot.
/// Growth reports allocation failure as [`Error::Alloc`] instead of aborting.
#[derive(Clone, Debug)]
pub(crate) struct Store<T> {
    slots: Vec<T>,
}

impl<T: Default> Store<T> {
    /// Allocates a store of `len` zeroed slots.
    pub(crate) fn with_slots(len: usize) -> Result<Self, Error> {
        let mut store = Store { slots: Vec::new() };
        store.resize_zeroed(len)?;
        Ok(store)
    }

    /// Grows or truncates the store to `len` slots. New slots are zeroed.
    ///
    /// On failure the store is unchanged.
    pub(crate) fn resize_zeroed(&mut self, len: usize) -> Result<(), Error> {
        #[cfg(test)]
        if len > SLOT_LIMIT.with(core::cell::Cell::get) {
            return Err(Error::Alloc { slots: len });
        }
        if len > self.slots.len() {
            self.slots
                .try_reserve_exact(len - self.slots.len())
                .map_err(|_| Error::Alloc { slots: len })?;
        }
        self.slots.resize_with(len, T::default);
        Ok(())
    }

    /// Resets every slot to its zeroed state, dropping the old contents.
    pub(crate) fn zero_fill(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = T::default());
    }
}

#[cfg(test)]
std::thread_local! {
    static SLOT_LIMIT: core::cell::Cell<usize> = const { core::cell::Cell::new(usize::MAX) };
}

/// Runs `f` with allocations above `limit` slots failing as if the allocator
/// were exhausted.
#[cfg(test)]
pub(crate) fn with_slot_limit<R>(limit: usize, f: impl FnOnce() -> R) -> R {
    let previous = SLOT_LIMIT.with(|cell| cell.replace(limit));
    let result = f();
    SLOT_LIMIT.with(|cell| cell.set(previous));
    result
}

impl<T> Store<T> {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn iter(&self) -> core::slice::Iter<'_, T> {
        self.slots.iter()
    }

    #[inline]
    pub(crate) fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.slots.iter_mut()
    }
}

impl<T> Index<usize> for Store<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.slots[index]
    }
}

impl<T> IndexMut<usize> for Store<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.slots[index]
    }
}

impl<T> IntoIterator for Store<T> {
    type Item = T;
    type IntoIter = alloc::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}
