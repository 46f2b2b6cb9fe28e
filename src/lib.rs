#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Error and result types for map construction.
pub mod error;

/// An open-addressed `u64`-keyed map using linear probing.
///
/// This module provides `IntMap`, which keeps its keys and values in two
/// parallel power-of-two arrays and deletes by backward shifting, so lookups
/// never have to skip tombstones.
pub mod int_map;

/// A `u64` set built on top of `IntMap`.
pub mod int_set;

/// Diagnostics for inspecting table occupancy and probe lengths.
#[cfg(any(test, feature = "stats"))]
pub mod stats;

#[cfg(test)]
mod proptests;

pub use error::Error;
pub use error::Result;
pub use int_map::DEFAULT_FILL_FACTOR;
pub use int_map::IntMap;
pub use int_set::IntSet;
