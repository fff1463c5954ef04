//! Merit function for one `(rvA, rvB)` grid point.
//!
//! Everything a merit evaluation reads lives in [`RunContext`], built once
//! after loading and shared read-only by all workers. The only mutable state
//! is the per-call velocity matrix.

use nalgebra::DMatrix;

use crate::data::fourier::FourierSpectra;
use crate::domain::{EnabledComponents, EpochTable, FixedElements};
use crate::error::AppError;
use crate::fit::disentangle;

/// Immutable inputs shared by every grid point.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub components: EnabledComponents,
    pub epochs: EpochTable,
    /// Components × epochs.
    pub line_strengths: DMatrix<f64>,
    pub observed: FourierSpectra,
    /// km/s per bin.
    pub rv_step: f64,
    pub elements: FixedElements,
}

impl RunContext {
    /// Chi-square of the disentangling for tight-orbit semi-amplitudes
    /// `rv_a`, `rv_b` (km/s).
    pub fn merit(&self, rv_a: f64, rv_b: f64) -> Result<f64, AppError> {
        let params = self.elements.to_triorb(rv_a, rv_b, self.rv_step);
        let k = self.components.count();
        let m = self.epochs.len();

        let mut velocities = DMatrix::<f64>::zeros(k, m);
        for j in 0..m {
            let rv = params.radial_velocities(self.epochs.times[j])?;
            // Correction in km/s, model output in bins.
            let correction = self.epochs.rv_corrections[j] / self.rv_step;
            for (row, component) in self.components.iter().enumerate() {
                velocities[(row, j)] = rv[component.index()] + correction;
            }
        }

        disentangle::residual(
            &self.observed,
            &velocities,
            &self.epochs.sigmas,
            &self.line_strengths,
        )
    }
}
