// THEORY:
// The `pipeline` module is the top-level API for the edge engine. It owns the
// things that live for the whole process: the kernel evaluators (built once from
// the configuration and shared by reference afterwards) and the rayon worker pool
// the fork-join driver runs on. A caller picks an algorithm and a strategy and gets
// back a freshly allocated output buffer plus timing; nothing carries over from one
// run to the next.

use crate::core_modules::fork_join::{DEFAULT_SPLIT_DIVISOR, ForkJoinPartitioner};
use crate::core_modules::kernels::{GradientKernel, NeighborThresholdKernel};
use crate::core_modules::serial_scan::scan_serial;
use crate::error::EdgeError;
use log::debug;
use std::fmt;
use std::time::{Duration, Instant};

// Re-export key data structures for the public API.
pub use crate::core_modules::fork_join::PartitionStats;
pub use crate::core_modules::kernels::{EdgeKernel, GradientVariant};
pub use crate::core_modules::pixel_buffer::pixel_buffer::{Intensity, PixelBuffer, Region};

/// Configuration for the EdgePipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeConfig {
    /// Threads in the fork-join pool.
    pub worker_threads: usize,
    /// Leaves are at most `image_width / split_divisor` wide.
    pub split_divisor: usize,
    /// Horizontal weight table for the gradient rule.
    pub gradient_variant: GradientVariant,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
            split_divisor: DEFAULT_SPLIT_DIVISOR,
            gradient_variant: GradientVariant::default(),
        }
    }
}

impl EdgeConfig {
    pub fn validate(&self) -> Result<(), EdgeError> {
        if self.worker_threads == 0 {
            return Err(EdgeError::InvalidConfig {
                field: "worker_threads",
                reason: "must be at least 1",
            });
        }
        if self.split_divisor == 0 {
            return Err(EdgeError::InvalidConfig {
                field: "split_divisor",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// The two edge rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Prewitt-style weighted gradient magnitude.
    Gradient,
    /// Mixed-neighborhood boundary detector.
    NeighborThreshold,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Gradient, Algorithm::NeighborThreshold];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Gradient => f.write_str("Prewitt"),
            Algorithm::NeighborThreshold => f.write_str("Edge detection"),
        }
    }
}

/// How the interior is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Serial,
    Parallel,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Serial => f.write_str("serial"),
            Strategy::Parallel => f.write_str("parallel"),
        }
    }
}

/// The result of one (algorithm, strategy) invocation.
#[derive(Debug, Clone)]
pub struct EdgeRun {
    pub algorithm: Algorithm,
    pub strategy: Strategy,
    pub output: PixelBuffer,
    pub elapsed: Duration,
    /// Only present for parallel runs.
    pub partition: Option<PartitionStats>,
}

/// The main, top-level struct for the edge engine.
pub struct EdgePipeline {
    config: EdgeConfig,
    pool: rayon::ThreadPool,
    gradient: GradientKernel,
    neighbor: NeighborThresholdKernel,
}

impl EdgePipeline {
    pub fn new(config: EdgeConfig) -> Result<Self, EdgeError> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("edge-worker-{i}"))
            .build()?;
        debug!(
            "EdgePipeline::new workers={} divisor={} gradient={:?}",
            config.worker_threads, config.split_divisor, config.gradient_variant
        );
        Ok(Self {
            gradient: GradientKernel::new(config.gradient_variant),
            neighbor: NeighborThresholdKernel,
            pool,
            config,
        })
    }

    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }

    pub fn kernel(&self, algorithm: Algorithm) -> &dyn EdgeKernel {
        match algorithm {
            Algorithm::Gradient => &self.gradient,
            Algorithm::NeighborThreshold => &self.neighbor,
        }
    }

    /// Runs one algorithm with one strategy into a new zeroed buffer shaped like `input`.
    pub fn run(&self, input: &PixelBuffer, algorithm: Algorithm, strategy: Strategy) -> EdgeRun {
        let kernel = self.kernel(algorithm);
        let mut output = input.zeroed_like();

        let start = Instant::now();
        let partition = match strategy {
            Strategy::Serial => {
                scan_serial(input, &mut output, kernel);
                None
            }
            Strategy::Parallel => {
                let partitioner = ForkJoinPartitioner::new(input.width, self.config.split_divisor);
                Some(self.pool.install(|| partitioner.run(input, &mut output, kernel)))
            }
        };
        let elapsed = start.elapsed();

        debug!(
            "EdgePipeline::run {algorithm} {strategy} {}x{} in {:.3}ms partition={partition:?}",
            input.width,
            input.height,
            elapsed.as_secs_f64() * 1000.0
        );

        EdgeRun {
            algorithm,
            strategy,
            output,
            elapsed,
            partition,
        }
    }
}
