use anyhow::Context;
use edge_vision::core_modules::image_helper::image_helper::{load_grayscale, save_grayscale};
use edge_vision::pipeline::{Algorithm, EdgeConfig, EdgePipeline, EdgeRun, GradientVariant};
use edge_vision::verification::VerificationReport;
use log::info;
use std::env;
use std::path::PathBuf;

const ARG_COUNT: usize = 6;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // --- 1. Argument Parsing & Setup ---
    let args: Vec<String> = env::args().collect();
    if args.len() != ARG_COUNT {
        usage();
        return Ok(());
    }
    let input_path = &args[1];
    let output_paths: Vec<PathBuf> = args[2..].iter().map(PathBuf::from).collect();

    // --- 2. Image Input ---
    let input = load_grayscale(input_path).with_context(|| format!("loading {input_path}"))?;
    info!("loaded {input_path}: {}x{}", input.width, input.height);

    // --- 3. Edge Pipeline Initialization ---
    let config = config_from_env()?;
    info!("config: {config:?}");
    let pipeline = EdgePipeline::new(config)?;

    // --- 4. Serial and Parallel Runs ---
    let reports: Vec<VerificationReport> = Algorithm::ALL
        .into_iter()
        .map(|algorithm| {
            let report = pipeline.verify(&input, algorithm);
            print_run(&report.serial);
            print_run(&report.parallel);
            report
        })
        .collect();

    // --- 5. Write Outputs ---
    // Order matches the command line: serial/parallel Prewitt, then serial/parallel edge.
    let outputs = reports.iter().flat_map(|r| [r.serial.output.clone(), r.parallel.output.clone()]);
    let writes = output_paths.into_iter().zip(outputs).map(|(path, buffer)| {
        tokio::task::spawn_blocking(move || {
            save_grayscale(&path, &buffer).with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {}", path.display());
            anyhow::Ok(())
        })
    });
    for result in futures::future::join_all(writes).await {
        result??;
    }

    // --- 6. Verification ---
    for report in &reports {
        println!("Verification: {report}");
    }

    Ok(())
}

fn print_run(run: &EdgeRun) {
    println!("Running {} version of {}", run.strategy, run.algorithm);
    println!("Time to execute = {}ms", run.elapsed.as_millis());
    if let Some(stats) = run.partition {
        info!(
            "{} {}: {} leaves, {} splits, depth {}",
            run.strategy, run.algorithm, stats.leaves, stats.splits, stats.max_depth
        );
    }
}

/// `EDGE_WORKERS`, `EDGE_SPLIT_DIVISOR` and `EDGE_LEGACY_KERNEL` override the defaults.
fn config_from_env() -> anyhow::Result<EdgeConfig> {
    let mut config = EdgeConfig::default();
    if let Ok(workers) = env::var("EDGE_WORKERS") {
        config.worker_threads = workers.parse().with_context(|| format!("EDGE_WORKERS={workers}"))?;
    }
    if let Ok(divisor) = env::var("EDGE_SPLIT_DIVISOR") {
        config.split_divisor = divisor.parse().with_context(|| format!("EDGE_SPLIT_DIVISOR={divisor}"))?;
    }
    if env::var("EDGE_LEGACY_KERNEL").is_ok_and(|v| is_truthy(&v)) {
        config.gradient_variant = GradientVariant::Legacy;
    }
    Ok(config)
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

fn usage() {
    println!();
    println!("ERROR: call program like:");
    println!();
    println!(
        "edge_tester input.bmp outputSerialPrewitt.bmp outputParallelPrewitt.bmp \
         outputSerialEdge.bmp outputParallelEdge.bmp"
    );
    println!();
}
