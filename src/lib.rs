//! A skiplist is a way of storing elements in such a way that elements can be
//! efficiently accessed, inserted and removed, all in `O(log(n))` on average.
//!
//! Conceptually, the skipmap in this crate resembles something like:
//!
//! ```text
//! <head>---------------------------------------------------------------------------------
//! <head>------------------------------------------------ --> [7]-------------------------
//! <head>---------------- --> [3]------------------------ --> [7]-------------------------
//! <head> --> [1]-------- --> [3]-------- --> [5]-------- --> [7]-------- --> [9]---------
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10]
//! ```
//!
//! where each layer starts with a keyless sentinel `<head>`, and each key
//! `[x]` on a layer above the bottom one links down to the same key on the
//! layer below, allowing a search to effectively skip ahead. The topmost
//! layer is always empty. This is the output of
//! [`SkipMap::debug_structure`] after inserting the keys 1 to 10.
//!
//! Most skiplists decide how many layers a key reaches by flipping a random
//! coin. The [`SkipMap`] in this crate flips a *deterministic* coin instead:
//! the flips for a key are read from a one-byte hash of the key itself (see
//! [`level_generator::FlipHash`]). Inserting the same keys in the same order
//! therefore always builds exactly the same structure, which makes the map
//! suitable for reproducible tests and benchmarks.
//!
//! ```
//! use deterministic_skipmap::{SkipMap, SkipMapError};
//!
//! let mut skipmap = SkipMap::new();
//! for key in [10_u32, 20, 5, 15] {
//!     skipmap.insert(key, key * 2);
//! }
//!
//! assert_eq!(skipmap.keys_in_order(), vec![5, 10, 15, 20]);
//! assert_eq!(skipmap.next_key(&10), Ok(&15));
//! assert_eq!(skipmap.previous_key(&5), Err(SkipMapError::NoPredecessor));
//! // 15 = 0b1111, so its first four flips come up heads.
//! assert_eq!(skipmap.height(&15), Ok(5));
//! ```
//!
//! The ordering of the keys **must** be well-behaved. Specifically, it must
//! be a total order which does not change while a key is in the map. Failure to
//! satisfy this results in unexpected behaviour, and may trip one of the
//! structural checks, which panic.

pub mod level_generator;
mod skipmap;
mod skipnode;

#[cfg(test)]
mod proptests;

pub use skipmap::{Iter, SkipMap, SkipMapError};
