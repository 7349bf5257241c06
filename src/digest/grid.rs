//! Block sizing.
//!
//! A block length is the largest divisor of the image dimension found by
//! scanning down from an upper bound, so the grid tiles the axis exactly.

use serde::{Deserialize, Serialize};

/// Bounds of the divisor search along one axis.
///
/// The scan runs from `min(max(dimension / divisor, min_upper), dimension - 1)`
/// down to `lower_bound` (exclusive). Without a hit the axis falls back to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridPolicy {
    pub divisor: u32,
    pub min_upper: u32,
    pub lower_bound: u32,
}

impl Default for GridPolicy {
    fn default() -> Self {
        Self {
            divisor: 10,
            min_upper: 50,
            lower_bound: 4,
        }
    }
}

impl GridPolicy {
    /// First candidate tried for `dimension`. A block never spans the whole axis.
    pub fn upper_bound(&self, dimension: u32) -> u32 {
        dimension
            .checked_div(self.divisor)
            .unwrap_or(0)
            .max(self.min_upper)
            .min(dimension.saturating_sub(1))
    }

    pub fn block_length(&self, dimension: u32) -> u32 {
        let lowest = self.lower_bound.saturating_add(1);
        (lowest..=self.upper_bound(dimension))
            .rev()
            .find(|candidate| dimension % candidate == 0)
            .unwrap_or(1)
    }
}

/// Block length for `dimension` under the default policy.
pub fn block_length(dimension: u32) -> u32 {
    GridPolicy::default().block_length(dimension)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(150, 50)]
    #[case(100, 50)]
    #[case(60, 30)]
    #[case(480, 48)]
    #[case(640, 64)]
    #[case(1080, 108)]
    #[case(1000, 100)]
    #[case(7, 1)]
    #[case(3, 1)]
    #[case(1, 1)]
    #[case(97, 1)]
    #[case(10, 5)]
    fn default_policy(#[case] dimension: u32, #[case] expected: u32) {
        assert_eq!(block_length(dimension), expected);
    }

    #[test]
    fn result_is_always_a_divisor_or_one() {
        for dimension in 1..=3000 {
            let length = block_length(dimension);
            assert!(length >= 1);
            if length > 1 {
                assert_eq!(dimension % length, 0, "{length} does not divide {dimension}");
                assert!(length > 4 && length < dimension);
            }
        }
    }

    #[test]
    fn below_lower_bound_is_per_pixel() {
        for dimension in 1..=4 {
            assert_eq!(block_length(dimension), 1);
        }
    }

    #[test]
    fn fifteenth_policy_picks_ten_for_150() {
        let policy = GridPolicy {
            divisor: 15,
            min_upper: 0,
            lower_bound: 4,
        };
        assert_eq!(policy.upper_bound(150), 10);
        assert_eq!(policy.block_length(150), 10);
        assert_eq!(policy.block_length(60), 1);
    }

    #[test]
    fn degenerate_policies_do_not_panic() {
        let zero_divisor = GridPolicy {
            divisor: 0,
            ..GridPolicy::default()
        };
        assert_eq!(zero_divisor.block_length(150), 50);

        let huge_floor = GridPolicy {
            lower_bound: u32::MAX,
            ..GridPolicy::default()
        };
        assert_eq!(huge_floor.block_length(150), 1);
        assert_eq!(block_length(0), 1);
    }
}
