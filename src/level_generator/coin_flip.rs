//! Deterministic coin flips.
//!
//! Instead of sampling a random number generator, the coin is "flipped" by
//! reading a single bit out of a one-byte hash of the key. The `$n$`-th flip
//! for a key (counting from zero) reads bit `$n \bmod 8$` of its hash, so the
//! height of a key's tower depends on nothing but the key's content.

use crate::level_generator::{HeightPolicy, LevelGenerator};

/// Number of bits in the hash byte, and therefore the period of the flips.
const BITS_IN_HASH: usize = 8;

// ////////////////////////////////////////////////////////////////////////////
// Flip Hash
// ////////////////////////////////////////////////////////////////////////////

/// Types which can be reduced to the one-byte hash used by [`flip_coin`].
///
/// The hash is the XOR of every byte of a fixed serialisation of the value:
///
/// - Integers use their big-endian two's-complement bytes. For a `u32` or
///   `i32` these are exactly its four constituent bytes. Since zero bytes do
///   not affect a XOR, a value which fits in 32 bits hashes identically at any
///   integer width.
/// - `str` and `String` use their UTF-8 bytes, and a `char` uses its UTF-8
///   encoding.
/// - `bool` is the byte `0` or `1`.
/// - Slices, `Vec`s and tuples XOR together the hashes of their elements.
///
/// Implementations must be pure: the same value must always produce the same
/// byte.
pub trait FlipHash {
    /// The one-byte hash of `self`.
    #[must_use]
    fn flip_hash(&self) -> u8;
}

/// XOR together a sequence of bytes.
fn xor_bytes(bytes: impl IntoIterator<Item = u8>) -> u8 {
    bytes.into_iter().fold(0, |hash, byte| hash ^ byte)
}

macro_rules! impl_flip_hash_for_integers {
    ($($t:ty),* $(,)?) => {
        $(
            impl FlipHash for $t {
                #[inline]
                fn flip_hash(&self) -> u8 {
                    xor_bytes(self.to_be_bytes())
                }
            }
        )*
    };
}

impl_flip_hash_for_integers!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize
);

impl FlipHash for bool {
    #[inline]
    fn flip_hash(&self) -> u8 {
        u8::from(*self)
    }
}

impl FlipHash for char {
    #[inline]
    fn flip_hash(&self) -> u8 {
        let mut buf = [0; 4];
        self.encode_utf8(&mut buf).as_bytes().flip_hash()
    }
}

impl FlipHash for str {
    #[inline]
    fn flip_hash(&self) -> u8 {
        xor_bytes(self.bytes())
    }
}

impl FlipHash for String {
    #[inline]
    fn flip_hash(&self) -> u8 {
        self.as_str().flip_hash()
    }
}

impl<T: FlipHash> FlipHash for [T] {
    #[inline]
    fn flip_hash(&self) -> u8 {
        xor_bytes(self.iter().map(FlipHash::flip_hash))
    }
}

impl<T: FlipHash> FlipHash for Vec<T> {
    #[inline]
    fn flip_hash(&self) -> u8 {
        self.as_slice().flip_hash()
    }
}

impl<T: FlipHash + ?Sized> FlipHash for &T {
    #[inline]
    fn flip_hash(&self) -> u8 {
        (**self).flip_hash()
    }
}

impl<A: FlipHash, B: FlipHash> FlipHash for (A, B) {
    #[inline]
    fn flip_hash(&self) -> u8 {
        self.0.flip_hash() ^ self.1.flip_hash()
    }
}

impl<A: FlipHash, B: FlipHash, C: FlipHash> FlipHash for (A, B, C) {
    #[inline]
    fn flip_hash(&self) -> u8 {
        self.0.flip_hash() ^ self.1.flip_hash() ^ self.2.flip_hash()
    }
}

/// Flip the coin for `key`, given how many flips have already been made for
/// it during the current insertion.
///
/// This returns whether bit `prior_flips % 8` of the key's [`FlipHash`] is
/// set. It has no hidden state: the same arguments always give the same
/// answer.
///
/// # Examples
///
/// ```
/// use deterministic_skipmap::level_generator::flip_coin;
///
/// // 5 = 0b101
/// assert!(flip_coin(&5_u32, 0));
/// assert!(!flip_coin(&5_u32, 1));
/// assert!(flip_coin(&5_u32, 2));
/// // The flips repeat every 8 bits.
/// assert!(flip_coin(&5_u32, 8));
/// ```
#[must_use]
#[inline]
pub fn flip_coin<K: FlipHash + ?Sized>(key: &K, prior_flips: usize) -> bool {
    let bit = prior_flips % BITS_IN_HASH;
    key.flip_hash() & (1 << bit) != 0
}

// ////////////////////////////////////////////////////////////////////////////
// Coin Flip generator
// ////////////////////////////////////////////////////////////////////////////

/// A level generator which extends a tower by one level for as long as
/// [`flip_coin`] keeps coming up heads, up to the limit set by its
/// [`HeightPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoinFlip {
    /// Bounds the height of every tower.
    policy: HeightPolicy,
}

impl CoinFlip {
    /// Create a coin flip generator bounded by `policy`.
    #[must_use]
    #[inline]
    pub fn new(policy: HeightPolicy) -> Self {
        CoinFlip { policy }
    }

    /// The policy bounding tower heights.
    #[must_use]
    #[inline]
    pub fn policy(&self) -> &HeightPolicy {
        &self.policy
    }
}

impl<K: FlipHash + ?Sized> LevelGenerator<K> for CoinFlip {
    #[inline]
    fn limit(&self, len: usize) -> usize {
        self.policy.limit(len)
    }

    /// Starting from a height of 1, keep flipping while the tower is below
    /// `limit` and the coin comes up heads.
    #[inline]
    fn height(&self, key: &K, limit: usize) -> usize {
        let mut height = 1;
        while height < limit && flip_coin(key, height - 1) {
            height += 1;
        }
        height
    }
}
