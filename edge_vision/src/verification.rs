// THEORY:
// The verification harness is the engine's runtime self-check. For one algorithm it
// runs the serial scan and the fork-join partitioner over the same read-only input
// into two independently allocated buffers, then compares them element by element.
// Any difference at all is a FAIL: the two strategies are required to be
// bit-identical, not merely close.

use crate::pipeline::{Algorithm, EdgePipeline, EdgeRun, PixelBuffer, Strategy};
use log::{debug, warn};
use std::fmt;

/// Outcome of one serial-vs-parallel comparison.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub algorithm: Algorithm,
    pub serial: EdgeRun,
    pub parallel: EdgeRun,
    /// Number of elements that differ between the two outputs.
    pub mismatches: usize,
}

impl VerificationReport {
    pub fn passed(&self) -> bool {
        self.mismatches == 0
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            write!(f, "{} PASS.", self.algorithm)
        } else {
            write!(f, "{} FAIL!", self.algorithm)
        }
    }
}

/// Counts differing elements of two equally sized buffers.
///
/// # Panics
/// Panics if the buffers differ in shape; that is a caller bug, not a FAIL.
pub fn count_mismatches(expected: &PixelBuffer, actual: &PixelBuffer) -> usize {
    assert!(
        expected.same_shape(actual) && expected.pixels.len() == actual.pixels.len(),
        "cannot compare a {}x{} buffer with a {}x{} buffer",
        expected.width,
        expected.height,
        actual.width,
        actual.height
    );
    expected
        .pixels
        .iter()
        .zip(&actual.pixels)
        .filter(|(a, b)| a != b)
        .count()
}

impl EdgePipeline {
    /// Runs `algorithm` serially, then in parallel, and compares the outputs.
    pub fn verify(&self, input: &PixelBuffer, algorithm: Algorithm) -> VerificationReport {
        let serial = self.run(input, algorithm, Strategy::Serial);
        let parallel = self.run(input, algorithm, Strategy::Parallel);
        let mismatches = count_mismatches(&serial.output, &parallel.output);

        if mismatches == 0 {
            debug!("EdgePipeline::verify {algorithm}: outputs identical");
        } else {
            warn!("EdgePipeline::verify {algorithm}: {mismatches} mismatching pixels");
        }

        VerificationReport {
            algorithm,
            serial,
            parallel,
            mismatches,
        }
    }
}
