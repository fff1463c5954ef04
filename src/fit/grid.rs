//! Grid axes and the parallel grid scan.
//!
//! The grid is evaluated over its linear index space (`i * sampB + j`,
//! A-major) in consecutive blocks. Each block is a rayon parallel map whose
//! ordered collect restores the canonical order, and its records are handed
//! to the sink before the next block starts. Output therefore streams in
//! row-major order regardless of the thread count.

use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;

use crate::domain::{AxisBounds, GridBounds, GridRecord};
use crate::error::AppError;
use crate::fit::merit::RunContext;

/// Grid points per worker thread in one block.
const POINTS_PER_THREAD: usize = 8;

/// Largest number of samples on one axis.
pub const MAX_AXIS_SAMPLES: usize = 1 << 24;

/// Samples `low + i*step` for `i = 0..=floor((high - low) / step)`.
///
/// The last sample falls short of `high` when the span is not a whole number
/// of steps.
pub fn linear_axis(bounds: AxisBounds) -> Result<Vec<f64>, AppError> {
    let AxisBounds { low, high, step } = bounds;
    if !(low.is_finite() && high.is_finite() && step.is_finite()) {
        return Err(AppError::domain(format!(
            "grid bounds must be finite: low={low}, high={high}, step={step}"
        )));
    }
    if step <= 0.0 {
        return Err(AppError::domain(format!("grid step must be positive, got {step}")));
    }
    if high < low {
        return Err(AppError::domain(format!(
            "grid axis is empty: high ({high}) is below low ({low})"
        )));
    }

    let steps = ((high - low) / step).floor();
    if !steps.is_finite() || steps >= MAX_AXIS_SAMPLES as f64 {
        return Err(AppError::domain(format!(
            "grid axis [{low}, {high}] with step {step} exceeds {MAX_AXIS_SAMPLES} samples"
        )));
    }
    let count = steps as usize + 1;
    Ok((0..count).map(|i| low + i as f64 * step).collect())
}

/// The two sample axes of the scan.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxes {
    pub rv_a: Vec<f64>,
    pub rv_b: Vec<f64>,
}

impl GridAxes {
    pub fn new(bounds: &GridBounds) -> Result<Self, AppError> {
        let rv_a = linear_axis(bounds.a)?;
        let rv_b = linear_axis(bounds.b)?;
        if rv_a.len().checked_mul(rv_b.len()).is_none() {
            return Err(AppError::domain(format!(
                "grid of {} x {} points is too large",
                rv_a.len(),
                rv_b.len()
            )));
        }
        Ok(Self { rv_a, rv_b })
    }

    pub fn len(&self) -> usize {
        self.rv_a.len() * self.rv_b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid values at a linear (A-major) index.
    pub fn point(&self, index: usize) -> (f64, f64) {
        let nb = self.rv_b.len();
        (self.rv_a[index / nb], self.rv_b[index % nb])
    }
}

/// Evaluate every grid point and pass the records to `sink` in row-major
/// order (A slow, B fast).
///
/// The first failing merit evaluation or sink call aborts the scan.
pub fn scan<F>(ctx: &RunContext, axes: &GridAxes, mut sink: F) -> Result<(), AppError>
where
    F: FnMut(&GridRecord) -> Result<(), AppError>,
{
    let total = axes.len();
    let block = (rayon::current_num_threads() * POINTS_PER_THREAD).max(1);
    info!(
        "Scanning {} x {} grid ({total} points) in blocks of {block}",
        axes.rv_a.len(),
        axes.rv_b.len()
    );
    let started = Instant::now();

    let mut start = 0;
    while start < total {
        let end = (start + block).min(total);
        let records: Vec<GridRecord> = (start..end)
            .into_par_iter()
            .map(|index| {
                let (rv_a, rv_b) = axes.point(index);
                let chisq = ctx.merit(rv_a, rv_b)?;
                Ok(GridRecord { rv_a, rv_b, chisq })
            })
            .collect::<Result<_, AppError>>()?;

        for record in &records {
            sink(record)?;
        }
        debug!("Evaluated {end}/{total} grid points");
        start = end;
    }

    info!("Grid scan finished in {:.2?}", started.elapsed());
    Ok(())
}
