// THEORY:
// This file is the main entry point for the `edge_vision` library crate.
// It exposes the `EdgePipeline` and its associated data structures
// (`EdgeConfig`, `EdgeRun`, `VerificationReport`, etc.) as the high-level
// interface, while the filters and drivers themselves live in `core_modules`.
//
// The engine computes binary edge maps from a grayscale raster with two fixed
// 5x5 rules, each runnable as a plain serial scan or as a recursive fork-join
// quad-split over a rayon pool, and checks that both strategies agree exactly.

pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod verification;
