// THEORY:
// Kernel evaluators are the leaves of the engine: pure functions that look at the
// 5x5 neighborhood around one pixel and decide whether it lies on an edge. They
// hold no state besides their own immutable weight tables, so one instance is
// built when the pipeline starts and then shared by reference with every worker.
//
// Two rules exist:
// 1.  **Gradient** (Prewitt-style): weighted sums with a horizontal and a vertical
//     5x5 table; the pixel is an edge when |h| + |v| reaches the threshold.
// 2.  **Neighbor threshold**: no weights. The pixel is an edge when its 24
//     neighbors are mixed, i.e. some but not all of them are brighter than the
//     threshold.
//
// Both return exactly 0 or 255 and both need a margin of 2 pixels. Callers are
// responsible for never evaluating inside the margin.

use crate::core_modules::pixel_buffer::pixel_buffer::{Intensity, PixelBuffer};

/// Every kernel here looks 2 pixels in each direction.
pub const MARGIN: usize = 2;
/// Intensity threshold shared by both rules.
pub const THRESHOLD: Intensity = 128;
pub const EDGE: Intensity = 255;
pub const NO_EDGE: Intensity = 0;

const SIZE: usize = 2 * MARGIN + 1;

pub type WeightTable = [[Intensity; SIZE]; SIZE];

/// A per-pixel edge classifier. Must be shareable across worker threads.
pub trait EdgeKernel: Sync {
    /// Border rows/columns that cannot be evaluated.
    fn margin(&self) -> usize {
        MARGIN
    }

    /// Classifies the pixel at (`row`, `column`), which must be at least
    /// `margin()` pixels from every border.
    fn evaluate(&self, input: &PixelBuffer, row: usize, column: usize) -> Intensity;
}

/// Which horizontal weight table the gradient rule uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientVariant {
    /// The symmetric table: the horizontal weights are the transpose of the vertical ones.
    #[default]
    Standard,
    /// The table as historically shipped, where a missing separator merged the last
    /// weight of row 4 with the first of row 5 (-7 -7 = -14) and left the final cell 0.
    Legacy,
}

const VERTICAL: WeightTable = [
    [9, 9, -7, -7, -7],
    [9, 5, -3, -3, -7],
    [9, 5, 0, -3, -7],
    [9, 5, -3, -3, -7],
    [9, 9, -7, -7, -7],
];

const HORIZONTAL: WeightTable = [
    [9, 9, 9, 9, 9],
    [9, 5, 5, 5, 9],
    [-7, -3, 0, -3, -7],
    [-7, -3, -3, -3, -7],
    [-7, -7, -7, -7, -7],
];

const HORIZONTAL_LEGACY: WeightTable = [
    [9, 9, 9, 9, 9],
    [9, 5, 5, 5, 9],
    [-7, -3, 0, -3, -7],
    [-7, -3, -3, -3, -14],
    [-7, -7, -7, -7, 0],
];

/// Gradient-magnitude edge rule over a pair of 5x5 weight tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientKernel {
    horizontal: WeightTable,
    vertical: WeightTable,
}

impl GradientKernel {
    pub fn new(variant: GradientVariant) -> Self {
        let horizontal = match variant {
            GradientVariant::Standard => HORIZONTAL,
            GradientVariant::Legacy => HORIZONTAL_LEGACY,
        };
        Self {
            horizontal,
            vertical: VERTICAL,
        }
    }

    pub fn horizontal(&self) -> &WeightTable {
        &self.horizontal
    }

    pub fn vertical(&self) -> &WeightTable {
        &self.vertical
    }
}

impl Default for GradientKernel {
    fn default() -> Self {
        Self::new(GradientVariant::Standard)
    }
}

impl EdgeKernel for GradientKernel {
    fn evaluate(&self, input: &PixelBuffer, row: usize, column: usize) -> Intensity {
        let mut horizontal_sum = 0;
        let mut vertical_sum = 0;
        for dr in 0..SIZE {
            let base = input.index(row + dr - MARGIN, column - MARGIN);
            let window = &input.pixels[base..base + SIZE];
            for (dc, &value) in window.iter().enumerate() {
                horizontal_sum += value * self.horizontal[dr][dc];
                vertical_sum += value * self.vertical[dr][dc];
            }
        }

        if horizontal_sum.abs() + vertical_sum.abs() < THRESHOLD {
            NO_EDGE
        } else {
            EDGE
        }
    }
}

/// Fires on mixed neighborhoods: at least one neighbor above the threshold, but not all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborThresholdKernel;

impl EdgeKernel for NeighborThresholdKernel {
    fn evaluate(&self, input: &PixelBuffer, row: usize, column: usize) -> Intensity {
        let mut any_above = false;
        let mut all_above = true;
        for r in row - MARGIN..=row + MARGIN {
            for c in column - MARGIN..=column + MARGIN {
                if r == row && c == column {
                    continue;
                }
                if input.get(r, c) > THRESHOLD {
                    any_above = true;
                } else {
                    all_above = false;
                }
            }
        }

        if any_above && !all_above { EDGE } else { NO_EDGE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with(width: usize, height: usize, fill: Intensity, spots: &[(usize, usize, Intensity)]) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height, vec![fill; width * height]).unwrap();
        for &(row, column, value) in spots {
            let i = buffer.index(row, column);
            buffer.pixels[i] = value;
        }
        buffer
    }

    #[test]
    fn standard_horizontal_is_transpose_of_vertical() {
        let kernel = GradientKernel::default();
        for r in 0..SIZE {
            for c in 0..SIZE {
                assert_eq!(kernel.horizontal()[r][c], kernel.vertical()[c][r]);
            }
        }
    }

    #[test]
    fn every_table_sums_to_zero() {
        // Uniform patches must never register a gradient.
        for table in [HORIZONTAL, HORIZONTAL_LEGACY, VERTICAL] {
            let sum: Intensity = table.iter().flatten().sum();
            assert_eq!(sum, 0);
        }
    }

    #[test]
    fn gradient_ignores_uniform_patches() {
        for fill in [0, 90, 200, 255] {
            let img = image_with(9, 9, fill, &[]);
            for variant in [GradientVariant::Standard, GradientVariant::Legacy] {
                assert_eq!(GradientKernel::new(variant).evaluate(&img, 4, 4), NO_EDGE);
            }
        }
    }

    #[test]
    fn gradient_fires_on_a_step() {
        let mut img = image_with(9, 9, 0, &[]);
        for row in 0..9 {
            for column in 5..9 {
                let i = img.index(row, column);
                img.pixels[i] = 255;
            }
        }
        assert_eq!(GradientKernel::default().evaluate(&img, 4, 4), EDGE);
    }

    #[test]
    fn legacy_table_drops_the_corner_weight() {
        // A faint spot in the bottom-right corner of the window: the standard table
        // sees -7 in both directions (140), the legacy table only the vertical -7 (70).
        let img = image_with(9, 9, 0, &[(6, 6, 10)]);
        assert_eq!(GradientKernel::new(GradientVariant::Standard).evaluate(&img, 4, 4), EDGE);
        assert_eq!(GradientKernel::new(GradientVariant::Legacy).evaluate(&img, 4, 4), NO_EDGE);
    }

    #[test]
    fn neighbor_threshold_needs_a_mixed_window() {
        let kernel = NeighborThresholdKernel;
        assert_eq!(kernel.evaluate(&image_with(5, 5, 0, &[]), 2, 2), NO_EDGE);
        assert_eq!(kernel.evaluate(&image_with(5, 5, 255, &[]), 2, 2), NO_EDGE);
        assert_eq!(kernel.evaluate(&image_with(5, 5, 0, &[(0, 4, 200)]), 2, 2), EDGE);
    }

    #[test]
    fn neighbor_threshold_skips_the_center() {
        let kernel = NeighborThresholdKernel;
        assert_eq!(kernel.evaluate(&image_with(5, 5, 0, &[(2, 2, 255)]), 2, 2), NO_EDGE);
        assert_eq!(kernel.evaluate(&image_with(5, 5, 255, &[(2, 2, 0)]), 2, 2), NO_EDGE);
    }

    #[test]
    fn threshold_value_itself_counts_as_dark() {
        let kernel = NeighborThresholdKernel;
        assert_eq!(kernel.evaluate(&image_with(5, 5, THRESHOLD, &[]), 2, 2), NO_EDGE);
        assert_eq!(kernel.evaluate(&image_with(5, 5, THRESHOLD + 1, &[(0, 0, THRESHOLD)]), 2, 2), EDGE);
    }
}
