use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use streamconv_core::Word;

use crate::{error::KernelError, window::Window};

/// Weights representable by the accelerator registers (4-bit signed).
pub const ACCELERATOR_WEIGHT_RANGE: RangeInclusive<i32> = -8..=7;

/// The three weights of a symmetric 3x3 kernel.
///
/// ```text
/// | w1 w2 w1 |
/// | w2 w3 w2 |
/// | w1 w2 w1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelWeights {
    /// Weight of the four corner cells.
    pub w1: i32,
    /// Weight of the four edge-center cells.
    pub w2: i32,
    /// Weight of the center cell.
    pub w3: i32,
}

impl KernelWeights {
    /// The 4-neighbour laplacian.
    pub const LAPLACIAN: Self = Self::new(0, 1, -4);

    /// Create a new set of weights.
    pub const fn new(w1: i32, w2: i32, w3: i32) -> Self {
        Self { w1, w2, w3 }
    }

    /// The weights as `[w1, w2, w3]`.
    pub fn as_array(&self) -> [i32; 3] {
        [self.w1, self.w2, self.w3]
    }

    /// Expand the weights into the full 3x3 matrix.
    pub fn to_matrix(&self) -> [[i32; 3]; 3] {
        let (a, b, c) = (self.w1, self.w2, self.w3);
        [[a, b, a], [b, c, b], [a, b, a]]
    }

    /// Check every weight against `range`.
    ///
    /// The first weight outside the range is reported; nothing is partially
    /// accepted.
    pub fn validate(&self, range: &RangeInclusive<i32>) -> Result<(), KernelError> {
        for (i, value) in self.as_array().into_iter().enumerate() {
            if !range.contains(&value) {
                return Err(KernelError::OutOfRange {
                    index: i + 1,
                    value,
                    min: *range.start(),
                    max: *range.end(),
                });
            }
        }
        Ok(())
    }

    /// Apply the kernel to a window.
    ///
    /// Computes `w1 * corners + w2 * edges + w3 * center` in wrapping 32-bit
    /// arithmetic; a negative result is returned as its two's-complement word.
    pub fn apply(&self, window: &Window) -> Word {
        (self.w1 as Word)
            .wrapping_mul(window.corners())
            .wrapping_add((self.w2 as Word).wrapping_mul(window.edges()))
            .wrapping_add((self.w3 as Word).wrapping_mul(window.center()))
    }
}

impl Default for KernelWeights {
    fn default() -> Self {
        Self::LAPLACIAN
    }
}

impl From<[i32; 3]> for KernelWeights {
    fn from(w: [i32; 3]) -> Self {
        Self::new(w[0], w[1], w[2])
    }
}
