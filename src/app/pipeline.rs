//! The grid-search workflow, independent of where input comes from and where
//! output goes:
//! token stream -> run setup -> Fourier transforms -> grid scan -> text stream
//!
//! Keeping this free of process state (stdin, argv, the logger) lets the
//! integration tests drive it with in-memory buffers.

use std::io::{BufRead, Write};

use log::info;

use crate::data::FourierSpectra;
use crate::domain::GridRecord;
use crate::error::AppError;
use crate::fit::{GridAxes, RunContext, scan};
use crate::io::export::ChisqSurface;
use crate::io::setup::{RunSetup, read_run_setup};
use crate::io::tokens::TokenReader;
use crate::report::SurfaceWriter;

/// Outputs of a completed scan besides the text stream.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub setup: RunSetup,
    pub points: usize,
    pub best: Option<GridRecord>,
    /// Present when the caller asked for the full surface.
    pub surface: Option<ChisqSurface>,
}

/// Shared read-only state for the merit function.
pub fn build_context(setup: &RunSetup) -> RunContext {
    let observed = FourierSpectra::from_window(&setup.spectra);
    info!(
        "Transformed {} spectra into {} Fourier modes",
        observed.epochs(),
        observed.modes()
    );
    RunContext {
        components: setup.components.clone(),
        epochs: setup.epochs.clone(),
        line_strengths: setup.line_strengths.clone(),
        observed,
        rv_step: setup.spectra.rv_step(),
        elements: setup.elements,
    }
}

/// Read the configuration from `input`, scan the grid and stream the results
/// to `out`.
///
/// Nothing is written to `out` until the whole configuration has been read
/// and validated.
pub fn run_grid<R, W>(input: R, out: W, keep_surface: bool) -> Result<RunOutput, AppError>
where
    R: BufRead,
    W: Write,
{
    let mut tokens = TokenReader::new(input);
    let setup = read_run_setup(&mut tokens)?;
    let axes = GridAxes::new(&setup.bounds)?;
    let ctx = build_context(&setup);

    let mut writer = SurfaceWriter::new(out);
    let mut surface = ChisqSurface::new(&axes);
    let mut best: Option<GridRecord> = None;

    writer.write_header()?;
    scan(&ctx, &axes, |record| {
        writer.write_record(record)?;
        if best.is_none_or(|b| record.chisq < b.chisq) {
            best = Some(*record);
        }
        if keep_surface {
            surface.push(record);
        }
        Ok(())
    })?;

    if let Some(b) = best {
        info!(
            "Minimum chi-square {:.5} at k1 = {:.5}, k2 = {:.5}",
            b.chisq, b.rv_a, b.rv_b
        );
    }

    Ok(RunOutput {
        setup,
        points: writer.written(),
        best,
        surface: keep_surface.then_some(surface),
    })
}
