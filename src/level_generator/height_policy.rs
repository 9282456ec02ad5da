//! Height policy.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`HeightPolicy`].
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum HeightPolicyError {
    /// The limit for small maps must be non-zero.
    #[error("small_limit must be non-zero.")]
    ZeroLimit,
    /// The growth factor must be non-zero.
    #[error("growth must be non-zero.")]
    ZeroGrowth,
}

/// Bounds the height of a tower as a function of the number of keys `$n$` the
/// map will hold once the tower is inserted:
///
/// ```math
/// \text{limit}(n) = \begin{cases}
///   \text{small\_limit} & n \le \text{small\_len} \\
///   \text{growth} \cdot \lceil \log_2 n \rceil + 1 & \text{otherwise}
/// \end{cases}
/// ```
///
/// Logarithmic formulas are unstable for tiny maps, so small maps get a fixed
/// amount of headroom instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightPolicy {
    /// Largest size for which `small_limit` applies.
    small_len: usize,
    /// Limit used for maps of at most `small_len` keys.
    small_limit: usize,
    /// Multiplier of `$\lceil \log_2 n \rceil$` for larger maps.
    growth: usize,
}

impl HeightPolicy {
    /// Create a new height policy.
    ///
    /// # Errors
    ///
    /// Both `small_limit` and `growth` must be non-zero, as every tower has a
    /// height of at least 1.
    #[inline]
    pub fn new(
        small_len: usize,
        small_limit: usize,
        growth: usize,
    ) -> Result<Self, HeightPolicyError> {
        if small_limit == 0 {
            return Err(HeightPolicyError::ZeroLimit);
        }
        if growth == 0 {
            return Err(HeightPolicyError::ZeroGrowth);
        }
        Ok(HeightPolicy {
            small_len,
            small_limit,
            growth,
        })
    }

    /// The maximum tower height for a map holding `len` keys.
    #[must_use]
    #[inline]
    pub fn limit(&self, len: usize) -> usize {
        if len <= self.small_len {
            return self.small_limit;
        }
        self.growth
            .saturating_mul(ceil_log2(len))
            .saturating_add(1)
    }
}

impl Default for HeightPolicy {
    /// 13 levels for up to 16 keys, `$3 \lceil \log_2 n \rceil + 1$` beyond.
    #[inline]
    fn default() -> Self {
        HeightPolicy {
            small_len: 16,
            small_limit: 13,
            growth: 3,
        }
    }
}

/// `$\lceil \log_2 n \rceil$`, with both 0 and 1 mapping to 0.
#[expect(
    clippy::as_conversions,
    reason = "The bit count of a usize always fits in a usize"
)]
fn ceil_log2(n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    (usize::BITS - (n - 1).leading_zeros()) as usize
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{HeightPolicy, HeightPolicyError, ceil_log2};

    #[test]
    fn invalid_limit() {
        assert_eq!(
            HeightPolicy::new(16, 0, 3).err(),
            Some(HeightPolicyError::ZeroLimit)
        );
        assert_eq!(
            HeightPolicy::new(16, 0, 3).unwrap_err().to_string(),
            "small_limit must be non-zero."
        );
    }

    #[test]
    fn invalid_growth() {
        assert_eq!(
            HeightPolicy::new(16, 13, 0).err(),
            Some(HeightPolicyError::ZeroGrowth)
        );
    }

    #[test]
    fn default_matches_explicit() -> Result<()> {
        assert_eq!(HeightPolicy::default(), HeightPolicy::new(16, 13, 3)?);
        Ok(())
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(3, 2)]
    #[case(4, 2)]
    #[case(5, 3)]
    #[case(16, 4)]
    #[case(17, 5)]
    #[case(1024, 10)]
    #[case(1025, 11)]
    fn log2(#[case] n: usize, #[case] expected: usize) {
        assert_eq!(ceil_log2(n), expected);
    }

    #[rstest]
    fn small_maps(#[values(0, 1, 2, 8, 15, 16)] len: usize) {
        assert_eq!(HeightPolicy::default().limit(len), 13);
    }

    #[rstest]
    #[case(17, 16)]
    #[case(32, 16)]
    #[case(33, 19)]
    #[case(1000, 31)]
    #[case(1024, 31)]
    #[case(1_000_000, 61)]
    fn large_maps(#[case] len: usize, #[case] expected: usize) {
        assert_eq!(HeightPolicy::default().limit(len), expected);
    }

    #[test]
    fn limit_never_decreases() {
        let policy = HeightPolicy::default();
        let mut previous = policy.limit(0);
        for len in 1..5000 {
            let limit = policy.limit(len);
            assert!(limit >= previous, "limit dropped at {len}");
            previous = limit;
        }
    }
}
