//! Skiplists spread their nodes over a tower of levels, whereby the lowest
//! level (level 0) contains all the nodes, and each level $n > 0$ contains a
//! subset of the nodes on level `n - 1`.
//!
//! Most skiplists decide how tall a node's tower is by repeatedly flipping a
//! random coin. This crate instead derives every flip from the key itself (see
//! [`CoinFlip`]), so that the same sequence of insertions always produces the
//! same structure.
//!
//! A generator also decides how tall a tower is _allowed_ to be for a map of a
//! given size, which bounds the number of levels a search has to traverse.

pub mod coin_flip;
pub mod height_policy;

pub use coin_flip::{CoinFlip, FlipHash, flip_coin};
pub use height_policy::{HeightPolicy, HeightPolicyError};

// ////////////////////////////////////////////////////////////////////////////
// Level Generator
// ////////////////////////////////////////////////////////////////////////////

/// Upon the insertion of a new key in the map, the key is replicated to higher
/// levels as determined by a [`LevelGenerator`].
pub trait LevelGenerator<K: ?Sized> {
    /// The maximum tower height allowed in a map that will hold `len` keys.
    ///
    /// This should never return 0.
    #[must_use]
    fn limit(&self, len: usize) -> usize;

    /// The tower height for `key`, counting the bottom level as height 1.
    ///
    /// This function should _never_ return a height outside of `[1, limit]`.
    /// Callers clamp the result regardless.
    #[must_use]
    fn height(&self, key: &K, limit: usize) -> usize;
}
