// THEORY:
// The `PixelBuffer` is the shared data substrate of the edge engine. It is a
// "dumb" data container: a flat, row-major vector of integer intensities plus
// the width and height needed to address it. Every other module reads from or
// writes into one of these.
//
// Key architectural principles:
// 1.  **Shape Invariant**: `pixels.len() == width * height` always holds. The only
//     fallible constructor checks it, so the filters never need to.
// 2.  **Read-Only Input**: An input buffer is borrowed immutably for the whole run,
//     which makes it safe to share across worker threads without synchronization.
// 3.  **Disjoint Output Views**: Output is never handed out whole to a worker.
//     Instead a `RegionRows` view lends out one mutable row slice per row of a
//     `Region`. Quartering a view moves those slices into four smaller views via
//     `split_at_mut`, so the compiler itself proves that no two workers can write
//     the same pixel. There are no locks and no atomics anywhere in the engine.

pub mod pixel_buffer {
    use crate::error::EdgeError;

    /// A single grayscale intensity. Inputs are 0..=255; filter outputs are 0 or 255.
    pub type Intensity = i32;

    /// A flat, row-major grayscale image. `pixels[row * width + column]`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PixelBuffer {
        pub width: usize,
        pub height: usize,
        pub pixels: Vec<Intensity>,
    }

    impl PixelBuffer {
        pub fn new(width: usize, height: usize, pixels: Vec<Intensity>) -> Result<Self, EdgeError> {
            let expected = width * height;
            if pixels.len() != expected {
                return Err(EdgeError::BufferSizeMismatch {
                    expected,
                    got: pixels.len(),
                });
            }
            Ok(Self {
                width,
                height,
                pixels,
            })
        }

        /// An all-zero buffer, the initial state of every output.
        pub fn zeroed(width: usize, height: usize) -> Self {
            Self {
                width,
                height,
                pixels: vec![0; width * height],
            }
        }

        /// A zeroed buffer with the same shape as `self`.
        pub fn zeroed_like(&self) -> Self {
            Self::zeroed(self.width, self.height)
        }

        #[inline]
        pub fn index(&self, row: usize, column: usize) -> usize {
            row * self.width + column
        }

        #[inline]
        pub fn get(&self, row: usize, column: usize) -> Intensity {
            self.pixels[self.index(row, column)]
        }

        pub fn same_shape(&self, other: &PixelBuffer) -> bool {
            self.width == other.width && self.height == other.height
        }

        /// The region of pixels at least `margin` away from every border, or `None`
        /// when the image is too small to have any.
        pub fn interior(&self, margin: usize) -> Option<Region> {
            let span = 2 * margin;
            if self.width <= span || self.height <= span {
                return None;
            }
            Some(Region {
                row: margin,
                column: margin,
                width: self.width - span,
                height: self.height - span,
            })
        }

        /// Lends out `region` as a set of disjoint mutable row slices.
        pub fn region_rows(&mut self, region: Region) -> RegionRows<'_> {
            assert!(
                region.row + region.height <= self.height && region.column + region.width <= self.width,
                "region {region:?} exceeds a {}x{} buffer",
                self.width,
                self.height
            );
            if self.width == 0 {
                return RegionRows { region, rows: Vec::new() };
            }
            let columns = region.column..region.column + region.width;
            let rows = self
                .pixels
                .chunks_mut(self.width)
                .skip(region.row)
                .take(region.height)
                .map(|row| &mut row[columns.clone()])
                .collect();
            RegionRows { region, rows }
        }
    }

    /// A rectangular sub-rectangle of an image, in absolute pixel coordinates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Region {
        pub row: usize,
        pub column: usize,
        pub width: usize,
        pub height: usize,
    }

    impl Region {
        pub fn new(row: usize, column: usize, width: usize, height: usize) -> Self {
            Self {
                row,
                column,
                width,
                height,
            }
        }

        pub fn area(&self) -> usize {
            self.width * self.height
        }

        pub fn is_empty(&self) -> bool {
            self.width == 0 || self.height == 0
        }

        pub fn contains_region(&self, other: &Region) -> bool {
            other.row >= self.row
                && other.column >= self.column
                && other.row + other.height <= self.row + self.height
                && other.column + other.width <= self.column + self.width
        }

        /// Splits into (top-left, bottom-left, top-right, bottom-right).
        ///
        /// The left/top halves take `n / 2` and the right/bottom halves take
        /// `(n + 1) / 2`, so the four quadrants tile `self` exactly for odd and even
        /// sizes alike. Quadrants of a 1-wide or 1-high region may be empty.
        pub fn quarter(&self) -> [Region; 4] {
            let left = self.width / 2;
            let right = (self.width + 1) / 2;
            let top = self.height / 2;
            let bottom = (self.height + 1) / 2;
            [
                Region::new(self.row, self.column, left, top),
                Region::new(self.row + top, self.column, left, bottom),
                Region::new(self.row, self.column + left, right, top),
                Region::new(self.row + top, self.column + left, right, bottom),
            ]
        }
    }

    /// Exclusive write access to one `Region` of an output buffer.
    ///
    /// `rows[i]` is row `region.row + i`, restricted to the region's columns.
    #[derive(Debug)]
    pub struct RegionRows<'a> {
        region: Region,
        rows: Vec<&'a mut [Intensity]>,
    }

    impl<'a> RegionRows<'a> {
        pub fn region(&self) -> Region {
            self.region
        }

        /// Writes one pixel, addressed in absolute image coordinates.
        #[inline]
        pub fn set(&mut self, row: usize, column: usize, value: Intensity) {
            self.rows[row - self.region.row][column - self.region.column] = value;
        }

        /// Moves the row slices into four quadrant views, in `Region::quarter` order.
        pub fn quarter(self) -> [RegionRows<'a>; 4] {
            let [top_left, bottom_left, top_right, bottom_right] = self.region.quarter();
            let mut top_rows = self.rows;
            let bottom_rows = top_rows.split_off(top_left.height);
            let (tl, tr) = split_columns(top_rows, top_left.width);
            let (bl, br) = split_columns(bottom_rows, bottom_left.width);
            [
                RegionRows { region: top_left, rows: tl },
                RegionRows { region: bottom_left, rows: bl },
                RegionRows { region: top_right, rows: tr },
                RegionRows { region: bottom_right, rows: br },
            ]
        }
    }

    fn split_columns<'a>(
        rows: Vec<&'a mut [Intensity]>,
        at: usize,
    ) -> (Vec<&'a mut [Intensity]>, Vec<&'a mut [Intensity]>) {
        rows.into_iter().map(|row| row.split_at_mut(at)).unzip()
    }
}
