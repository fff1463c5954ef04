//! Frequency-domain copy of the windowed observations.

use nalgebra::DMatrix;
use num_complex::Complex64;
use rayon::prelude::*;

use crate::data::spectrum::WindowedSpectra;
use crate::math::dft::{half_spectrum_len, real_dft_with, twiddles};

/// Forward transforms of every epoch, one row per epoch and one column per
/// Fourier mode `0..=N/2`.
#[derive(Debug, Clone)]
pub struct FourierSpectra {
    pub(crate) bins: usize,
    pub(crate) coefficients: DMatrix<Complex64>,
}

impl FourierSpectra {
    /// Transform each epoch's flux (wavelength column excluded).
    pub fn from_window(window: &WindowedSpectra) -> Self {
        let n = window.bins();
        let table = twiddles(n);

        let rows: Vec<Vec<Complex64>> = (0..window.epochs())
            .into_par_iter()
            .map(|epoch| {
                let flux: Vec<f64> = window.flux(epoch).iter().copied().collect();
                real_dft_with(&flux, &table)
            })
            .collect();

        let modes = half_spectrum_len(n);
        let coefficients = DMatrix::from_fn(rows.len(), modes, |j, k| rows[j][k]);
        Self {
            bins: n,
            coefficients,
        }
    }

    /// Length `N` of the real signals.
    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn epochs(&self) -> usize {
        self.coefficients.nrows()
    }

    pub fn modes(&self) -> usize {
        self.coefficients.ncols()
    }

    pub fn coefficients(&self) -> &DMatrix<Complex64> {
        &self.coefficients
    }
}
