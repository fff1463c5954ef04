//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - sizes the worker pool
//! - runs the grid search on stdin (or `--input`) and streams to stdout
//! - writes the optional surface export

use std::fs::File;
use std::io::{BufRead, BufReader};

use clap::Parser;
use log::{info, warn};

use crate::cli::Cli;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `gridfd3` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    setup_logging(cli.log_level());

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| AppError::domain(format!("cannot start {threads} worker threads: {e}")))?;
    }
    info!("Using {} worker threads", rayon::current_num_threads());

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| AppError::io(format!("failed to open '{}'", path.display()), e))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(std::io::stdin().lock()),
    };

    let stdout = std::io::stdout().lock();
    let run = pipeline::run_grid(input, stdout, cli.export.is_some())?;
    info!("Wrote {} grid points", run.points);

    if let (Some(path), Some(surface)) = (&cli.export, run.surface) {
        if !surface.is_complete() {
            warn!("Surface export is missing grid points");
        }
        if let Some(best) = surface.minimum() {
            info!(
                "Surface minimum {:.5} at k1 = {:.5}, k2 = {:.5}",
                best.chisq, best.rv_a, best.rv_b
            );
        }
        let file = surface.into_file(&run.setup);
        crate::io::export::write_surface_json(path, &file)?;
        info!("Exported chi-square surface to {}", path.display());
    }

    Ok(())
}

/// Log to stderr so stdout carries only the chi-square stream. `RUST_LOG`
/// takes precedence over the `-v` level.
fn setup_logging(level: log::LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stderr);
    builder.format_target(false);
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // A logger is already installed when embedded in tests.
    let _ = builder.try_init();
}
