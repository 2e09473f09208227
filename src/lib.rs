#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;

/// 32-bit FNV-1a hashing.
pub mod hash;

pub mod hash_table;

/// A typed map over the byte table for fixed-layout keys and values.
pub mod hash_map;

/// A typed set over the byte table for fixed-layout members.
pub mod hash_set;

mod layout;
mod span;
mod store;

/// Probe-length and occupancy statistics.
#[cfg(feature = "stats")]
pub mod stats;

#[cfg(test)]
mod proptests;

pub use error::Error;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::Entry;
pub use hash_table::HashTable;
pub use layout::FixedLayout;
pub use span::Span;
