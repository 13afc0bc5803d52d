// THEORY:
// The `ForkJoinPartitioner` is the parallel counterpart of the serial scan. It
// recursively quarters a region of the output and evaluates the four quadrants as
// concurrent tasks on a rayon pool, joining on all four before it returns.
//
// Key architectural principles:
// 1.  **Exact Tiling**: Quadrants come from `Region::quarter`, which uses the
//     `n / 2` + `(n + 1) / 2` split. The four children cover the parent with no gap
//     and no overlap at every level, so every output pixel is owned by exactly one
//     leaf task.
// 2.  **Ownership Instead Of Locks**: Each task receives its quadrant as a
//     `RegionRows` view that it owns outright. The input is a shared `&PixelBuffer`.
//     Nothing is locked and nothing is atomic; a tiling bug would be a compile-time
//     borrow error, not a silent race.
// 3.  **Full Join**: A split is `join(join(a, b), join(c, d))`. Neither level
//     returns until both sides have, so a parent is complete only once all of its
//     descendants are.
// 4.  **Leaf Threshold**: A region no wider than `fullWidth / divisor` is evaluated
//     sequentially with the same inner loop as the serial scan. The threshold is
//     floored at 1 so that regions of narrow images still shrink to leaves.

use crate::core_modules::kernels::EdgeKernel;
use crate::core_modules::pixel_buffer::pixel_buffer::{PixelBuffer, Region, RegionRows};
use crate::core_modules::serial_scan::evaluate_region;

/// Default divisor: leaves are at most 1/16 of the image wide.
pub const DEFAULT_SPLIT_DIVISOR: usize = 16;

/// Shape of one partitioned run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionStats {
    /// Regions evaluated sequentially.
    pub leaves: usize,
    /// Regions split into four concurrent tasks.
    pub splits: usize,
    /// Deepest recursion level reached; the entry region is depth 0.
    pub max_depth: usize,
}

impl PartitionStats {
    fn leaf(depth: usize) -> Self {
        Self {
            leaves: 1,
            splits: 0,
            max_depth: depth,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            leaves: self.leaves + other.leaves,
            splits: self.splits + other.splits,
            max_depth: self.max_depth.max(other.max_depth),
        }
    }
}

/// Recursive quad-split driver for one image width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForkJoinPartitioner {
    leaf_width: usize,
}

impl ForkJoinPartitioner {
    /// # Panics
    /// Panics if `split_divisor` is zero.
    pub fn new(full_width: usize, split_divisor: usize) -> Self {
        assert!(split_divisor > 0, "split divisor must be positive");
        Self {
            leaf_width: (full_width / split_divisor).max(1),
        }
    }

    /// Widest region that is evaluated without splitting.
    pub fn leaf_width(&self) -> usize {
        self.leaf_width
    }

    pub fn is_leaf(&self, region: &Region) -> bool {
        region.width <= self.leaf_width
    }

    /// Fills every interior pixel of `output`. Runs on the current rayon pool.
    ///
    /// # Panics
    /// Panics if `input` and `output` differ in shape.
    pub fn run<K: EdgeKernel + ?Sized>(&self, input: &PixelBuffer, output: &mut PixelBuffer, kernel: &K) -> PartitionStats {
        assert!(
            input.same_shape(output),
            "output {}x{} does not match input {}x{}",
            output.width,
            output.height,
            input.width,
            input.height
        );
        match input.interior(kernel.margin()) {
            Some(interior) => self.fork(input, output.region_rows(interior), kernel, 0),
            None => PartitionStats::default(),
        }
    }

    /// Fills one region of `output`, which must lie inside the interior.
    ///
    /// # Panics
    /// Panics if the shapes differ or `region` reaches into the margin.
    pub fn fill_region<K: EdgeKernel + ?Sized>(
        &self,
        input: &PixelBuffer,
        output: &mut PixelBuffer,
        region: Region,
        kernel: &K,
    ) -> PartitionStats {
        assert!(input.same_shape(output), "output shape does not match input");
        let inside = input
            .interior(kernel.margin())
            .is_some_and(|interior| interior.contains_region(&region));
        assert!(inside, "region {region:?} is not inside the interior");
        self.fork(input, output.region_rows(region), kernel, 0)
    }

    fn fork<K: EdgeKernel + ?Sized>(
        &self,
        input: &PixelBuffer,
        mut view: RegionRows<'_>,
        kernel: &K,
        depth: usize,
    ) -> PartitionStats {
        if self.is_leaf(&view.region()) {
            evaluate_region(input, &mut view, kernel);
            return PartitionStats::leaf(depth);
        }

        let [top_left, bottom_left, top_right, bottom_right] = view.quarter();
        let next = depth + 1;
        let ((a, b), (c, d)) = rayon::join(
            || {
                rayon::join(
                    || self.fork(input, top_left, kernel, next),
                    || self.fork(input, bottom_left, kernel, next),
                )
            },
            || {
                rayon::join(
                    || self.fork(input, top_right, kernel, next),
                    || self.fork(input, bottom_right, kernel, next),
                )
            },
        );

        let mut stats = a.merge(b).merge(c).merge(d);
        stats.splits += 1;
        stats
    }

    /// The leaf regions a run over `region` evaluates, in depth-first order.
    pub fn plan(&self, region: Region) -> Vec<Region> {
        let mut leaves = Vec::new();
        let mut pending = vec![region];
        while let Some(next) = pending.pop() {
            if self.is_leaf(&next) {
                leaves.push(next);
            } else {
                pending.extend(next.quarter().into_iter().rev());
            }
        }
        leaves
    }
}
