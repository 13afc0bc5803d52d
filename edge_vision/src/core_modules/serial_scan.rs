// THEORY:
// The serial scan is the reference driver and the correctness oracle for the
// parallel one. It walks every interior pixel in row-major order on the calling
// thread and leaves the margin untouched. The per-region inner loop lives here and
// is reused verbatim by the fork-join partitioner's leaf tasks, so both drivers
// evaluate a pixel in exactly the same way.

use crate::core_modules::kernels::EdgeKernel;
use crate::core_modules::pixel_buffer::pixel_buffer::{PixelBuffer, RegionRows};

/// Fills every interior pixel of `output` from `input`.
///
/// `output` is expected to be freshly zeroed; margin pixels keep that value.
///
/// # Panics
/// Panics if `input` and `output` differ in shape.
pub fn scan_serial<K: EdgeKernel + ?Sized>(input: &PixelBuffer, output: &mut PixelBuffer, kernel: &K) {
    assert!(
        input.same_shape(output),
        "output {}x{} does not match input {}x{}",
        output.width,
        output.height,
        input.width,
        input.height
    );

    let Some(interior) = input.interior(kernel.margin()) else {
        return;
    };
    let mut view = output.region_rows(interior);
    evaluate_region(input, &mut view, kernel);
}

/// Evaluates every pixel of `view`, top row first, left to right.
pub(crate) fn evaluate_region<K: EdgeKernel + ?Sized>(input: &PixelBuffer, view: &mut RegionRows<'_>, kernel: &K) {
    let region = view.region();
    for row in region.row..region.row + region.height {
        for column in region.column..region.column + region.width {
            view.set(row, column, kernel.evaluate(input, row, column));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::kernels::{GradientKernel, NeighborThresholdKernel};
    use crate::core_modules::pixel_buffer::pixel_buffer::Intensity;

    /// Counts how often it is invoked and where.
    struct Probe(std::sync::Mutex<Vec<(usize, usize)>>);

    impl EdgeKernel for Probe {
        fn evaluate(&self, _input: &PixelBuffer, row: usize, column: usize) -> Intensity {
            self.0.lock().unwrap().push((row, column));
            7
        }
    }

    #[test]
    fn visits_interior_in_row_major_order() {
        let input = PixelBuffer::zeroed(6, 5);
        let mut output = input.zeroed_like();
        let probe = Probe(std::sync::Mutex::new(Vec::new()));
        scan_serial(&input, &mut output, &probe);

        let visited = probe.0.into_inner().unwrap();
        assert_eq!(visited, vec![(2, 2), (2, 3)]);
        assert_eq!(output.get(2, 2), 7);
        assert_eq!(output.get(2, 3), 7);
        assert_eq!(output.pixels.iter().filter(|&&v| v == 7).count(), 2);
    }

    #[test]
    fn all_zero_image_stays_zero() {
        let input = PixelBuffer::zeroed(9, 9);
        let mut output = input.zeroed_like();
        scan_serial(&input, &mut output, &GradientKernel::default());
        assert!(output.pixels.iter().all(|&v| v == 0));
    }

    #[test]
    fn tiny_image_is_left_untouched() {
        let input = PixelBuffer::new(4, 4, vec![255; 16]).unwrap();
        let mut output = input.zeroed_like();
        scan_serial(&input, &mut output, &NeighborThresholdKernel);
        assert!(output.pixels.iter().all(|&v| v == 0));
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn mismatched_output_panics() {
        let input = PixelBuffer::zeroed(9, 9);
        let mut output = PixelBuffer::zeroed(9, 8);
        scan_serial(&input, &mut output, &NeighborThresholdKernel);
    }
}
