//! Observed multi-epoch spectra and wavelength windowing.
//!
//! The observation matrix has one row per wavelength bin. Column 0 holds the
//! natural log of the wavelength (uniformly spaced), columns `1..=M` hold the
//! flux of each epoch.

use std::path::Path;

use nalgebra::{DMatrix, DVectorView};

use crate::error::AppError;
use crate::io::matrix::load_matrix;

/// Speed of light in km/s.
pub const SPEED_OF_LIGHT_KMS: f64 = 299_792.458;

/// The full, unwindowed observation matrix.
#[derive(Debug, Clone)]
pub struct ObservedSpectra {
    data: DMatrix<f64>,
}

impl ObservedSpectra {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let data = load_matrix(path)?;
        Self::from_matrix(data).map_err(|e| AppError::load(path, e.to_string()))
    }

    pub fn from_matrix(data: DMatrix<f64>) -> Result<Self, AppError> {
        if data.ncols() < 2 {
            return Err(AppError::domain(
                "observation matrix needs a wavelength column and at least one epoch",
            ));
        }
        if data.nrows() < 2 {
            return Err(AppError::domain(
                "observation matrix needs at least two wavelength bins",
            ));
        }
        let axis = data.column(0);
        if axis.iter().any(|z| !z.is_finite()) {
            return Err(AppError::domain("wavelength axis contains non-finite values"));
        }
        if let Some(i) = (1..axis.len()).find(|&i| axis[i] <= axis[i - 1]) {
            return Err(AppError::domain(format!(
                "wavelength axis is not strictly increasing at bin {i}"
            )));
        }
        Ok(Self { data })
    }

    pub fn epochs(&self) -> usize {
        self.data.ncols() - 1
    }

    pub fn bins(&self) -> usize {
        self.data.nrows()
    }

    pub fn log_wavelengths(&self) -> DVectorView<'_, f64> {
        self.data.column(0)
    }

    /// Velocity width of one bin in km/s.
    ///
    /// Derived from the mean log-wavelength spacing of the full axis:
    /// `c * (exp(Δlnλ) - 1)`.
    pub fn rv_step(&self) -> f64 {
        let axis = self.log_wavelengths();
        let n = axis.len();
        let dz = (axis[n - 1] - axis[0]) / (n - 1) as f64;
        SPEED_OF_LIGHT_KMS * dz.exp_m1()
    }

    /// Inclusive bin range covering `[z0, z1]`, if any bin falls inside.
    pub fn window_range(&self, z0: f64, z1: f64) -> Option<(usize, usize)> {
        let axis = self.log_wavelengths();
        let n = axis.len();
        let first = (0..n).find(|&i| axis[i] >= z0)?;
        let last = (0..n).rev().find(|&i| axis[i] <= z1)?;
        (first <= last).then_some((first, last))
    }

    /// Narrow to `[z0, z1]`, consuming the full matrix.
    ///
    /// The bin width is taken from the full axis before it is dropped, so it
    /// does not depend on the window.
    pub fn into_window(self, z0: f64, z1: f64) -> Result<WindowedSpectra, AppError> {
        let rv_step = self.rv_step();
        let (first_bin, last_bin) = self.window_range(z0, z1).ok_or_else(|| {
            AppError::domain(format!(
                "wavelength window [{z0}, {z1}] contains no bins"
            ))
        })?;
        let n = last_bin - first_bin + 1;
        let data = self.data.rows(first_bin, n).into_owned();

        Ok(WindowedSpectra {
            first_bin,
            last_bin,
            rv_step,
            data,
        })
    }
}

/// The observation matrix restricted to a wavelength window.
#[derive(Debug, Clone)]
pub struct WindowedSpectra {
    pub first_bin: usize,
    pub last_bin: usize,
    rv_step: f64,
    data: DMatrix<f64>,
}

impl WindowedSpectra {
    pub fn epochs(&self) -> usize {
        self.data.ncols() - 1
    }

    pub fn bins(&self) -> usize {
        self.data.nrows()
    }

    /// Bin width of the full, unwindowed axis.
    pub fn rv_step(&self) -> f64 {
        self.rv_step
    }

    pub fn log_wavelengths(&self) -> DVectorView<'_, f64> {
        self.data.column(0)
    }

    pub fn flux(&self, epoch: usize) -> DVectorView<'_, f64> {
        self.data.column(epoch + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Log-uniform axis starting at ln(4000) with `n` bins of width `dz`.
    fn synthetic(n: usize, epochs: usize, dz: f64) -> ObservedSpectra {
        let z_start = 4000f64.ln();
        let data = DMatrix::from_fn(n, epochs + 1, |i, j| {
            if j == 0 {
                z_start + i as f64 * dz
            } else {
                (i * 10 + j) as f64
            }
        });
        ObservedSpectra::from_matrix(data).unwrap()
    }

    #[test]
    fn rv_step_matches_log_spacing() {
        let obs = synthetic(101, 2, 1e-5);
        let expected = SPEED_OF_LIGHT_KMS * ((1e-5f64).exp() - 1.0);
        assert_relative_eq!(obs.rv_step(), expected, max_relative = 1e-8);
    }

    #[test]
    fn window_selects_inclusive_range() {
        let obs = synthetic(20, 1, 0.01);
        let z = obs.log_wavelengths().clone_owned();
        // Bounds slightly inside bins 3 and 11.
        let (i0, i1) = obs.window_range(z[3] - 0.001, z[11] + 0.001).unwrap();
        assert_eq!((i0, i1), (3, 11));

        let w = obs.into_window(z[3] - 0.001, z[11] + 0.001).unwrap();
        assert_eq!(w.bins(), i1 - i0 + 1);
        assert_eq!(w.log_wavelengths()[0], z[3]);
        assert_eq!(w.flux(0)[0], 31.0);
    }

    #[test]
    fn exact_bounds_are_included() {
        let obs = synthetic(10, 1, 0.01);
        let z = obs.log_wavelengths().clone_owned();
        assert_eq!(obs.window_range(z[2], z[5]), Some((2, 5)));
    }

    #[test]
    fn window_leaves_rv_step_unchanged() {
        let obs = synthetic(50, 3, 2e-5);
        let full = obs.rv_step();
        let z = obs.log_wavelengths().clone_owned();
        let w = obs.into_window(z[10], z[12]).unwrap();
        assert_eq!(w.rv_step(), full);
        assert_eq!(w.bins(), 3);
        assert_eq!(w.epochs(), 3);
    }

    #[test]
    fn single_bin_window_is_valid() {
        let obs = synthetic(10, 1, 0.01);
        let z = obs.log_wavelengths().clone_owned();
        let w = obs.into_window(z[4], z[4]).unwrap();
        assert_eq!(w.bins(), 1);
    }

    #[test]
    fn empty_window_is_a_domain_error() {
        let obs = synthetic(10, 1, 0.01);
        let z = obs.log_wavelengths().clone_owned();
        let gap = (z[4] + z[5]) / 2.0;
        assert!(obs.clone().into_window(gap, gap).is_err());
        assert!(obs.clone().into_window(z[9] + 1.0, z[9] + 2.0).is_err());
        assert!(obs.into_window(z[6], z[2]).is_err());
    }

    #[test]
    fn non_increasing_axis_is_rejected() {
        let data = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 0.0, 2.0, 0.0]);
        assert!(ObservedSpectra::from_matrix(data).is_err());
    }

    #[test]
    fn wavelength_only_matrix_is_rejected() {
        let data = DMatrix::from_row_slice(3, 1, &[1.0, 2.0, 3.0]);
        assert!(ObservedSpectra::from_matrix(data).is_err());
    }
}
