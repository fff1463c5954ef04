//! Spectral disentangling residual in Fourier space.
//!
//! Each observed spectrum is modelled as a sum of component spectra, each
//! scaled by its line strength at that epoch and Doppler shifted by the
//! model velocity (in bins). A shift by `v` bins multiplies Fourier mode `n`
//! by `exp(-2πi n v / N)`, so for every mode the unknown component spectra
//! solve a small weighted linear least-squares problem:
//!
//! ```text
//! A[j][k] = lf[k][j] / σ_j · exp(-2πi n v[k][j] / N)
//! b[j]    = X_j(n) / σ_j
//! ```
//!
//! The chi-square is the sum over modes of `‖b - A x‖²`, with the interior
//! modes counted twice to stand in for their conjugate partners, divided by
//! `N`. By Parseval this is the σ-weighted sum of squared residuals in
//! wavelength space.

use std::f64::consts::TAU;

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use crate::data::fourier::FourierSpectra;
use crate::error::AppError;
use crate::math::lstsq::{residual_norm_squared, solve_complex_least_squares};

/// Chi-square of the best disentangling for the given velocities.
///
/// - `velocities`: components × epochs, in bins
/// - `sigmas`: per-epoch flux uncertainties
/// - `line_strengths`: components × epochs
pub fn residual(
    observed: &FourierSpectra,
    velocities: &DMatrix<f64>,
    sigmas: &[f64],
    line_strengths: &DMatrix<f64>,
) -> Result<f64, AppError> {
    let m = observed.epochs();
    let k = velocities.nrows();
    let n = observed.bins();

    if velocities.ncols() != m || sigmas.len() != m || line_strengths.shape() != (k, m) {
        return Err(AppError::domain(format!(
            "disentangling inputs disagree: {m} epochs, velocities {:?}, {} sigmas, line strengths {:?}",
            velocities.shape(),
            sigmas.len(),
            line_strengths.shape()
        )));
    }

    let inv_sigma: Vec<f64> = sigmas.iter().map(|s| 1.0 / s).collect();
    let coefficients = observed.coefficients();

    let mut a = DMatrix::<Complex64>::zeros(m, k);
    let mut b = DVector::<Complex64>::zeros(m);
    let mut total = 0.0;

    for mode in 0..observed.modes() {
        for j in 0..m {
            b[j] = coefficients[(j, mode)] * inv_sigma[j];
        }

        let power: f64 = if k == 0 {
            b.iter().map(|c| c.norm_sqr()).sum()
        } else {
            let omega = -TAU * mode as f64 / n as f64;
            for j in 0..m {
                for c in 0..k {
                    a[(j, c)] = Complex64::from_polar(
                        line_strengths[(c, j)] * inv_sigma[j],
                        omega * velocities[(c, j)],
                    );
                }
            }
            let x = solve_complex_least_squares(&a, &b).ok_or_else(|| {
                AppError::domain(format!("disentangling failed at Fourier mode {mode}"))
            })?;
            residual_norm_squared(&a, &x, &b)
        };

        total += mode_weight(mode, n) * power;
    }

    Ok(total / n as f64)
}

/// Interior modes stand in for their conjugate partner as well.
fn mode_weight(mode: usize, n: usize) -> f64 {
    let nyquist = n % 2 == 0 && mode == n / 2;
    if mode == 0 || nyquist { 1.0 } else { 2.0 }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::math::dft::real_dft;
    use approx::assert_abs_diff_eq;

    /// Gaussian absorption profile centred on `centre`, wrapped around the
    /// axis so Fourier shifts stay exact.
    pub(crate) fn gaussian_line(n: usize, centre: f64, width: f64, depth: f64) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let mut d = i as f64 - centre;
                let half = n as f64 / 2.0;
                if d > half {
                    d -= n as f64;
                } else if d < -half {
                    d += n as f64;
                }
                -depth * (-0.5 * (d / width).powi(2)).exp()
            })
            .collect()
    }

    /// Fourier-domain observations generated exactly by the disentangling
    /// model: component templates shifted by `velocities` (bins) and scaled
    /// by `line_strengths`.
    pub(crate) fn synthetic_observations(
        templates: &[Vec<f64>],
        velocities: &DMatrix<f64>,
        line_strengths: &DMatrix<f64>,
    ) -> FourierSpectra {
        let n = templates[0].len();
        let spectra: Vec<Vec<Complex64>> = templates.iter().map(|t| real_dft(t)).collect();
        let modes = spectra[0].len();
        let m = velocities.ncols();

        let coefficients = DMatrix::from_fn(m, modes, |j, mode| {
            let omega = -TAU * mode as f64 / n as f64;
            spectra
                .iter()
                .enumerate()
                .map(|(c, s)| {
                    s[mode]
                        * line_strengths[(c, j)]
                        * Complex64::from_polar(1.0, omega * velocities[(c, j)])
                })
                .sum::<Complex64>()
        });

        FourierSpectra {
            bins: n,
            coefficients,
        }
    }

    fn two_star_setup() -> (Vec<Vec<f64>>, DMatrix<f64>, DMatrix<f64>) {
        let n = 64;
        let templates = vec![
            gaussian_line(n, 20.0, 2.5, 0.6),
            gaussian_line(n, 40.0, 4.0, 0.4),
        ];
        let velocities = DMatrix::from_row_slice(
            2,
            4,
            &[3.2, -1.5, 0.0, 2.7, -6.1, 2.9, 0.0, -5.3],
        );
        let line_strengths = DMatrix::from_row_slice(2, 4, &[0.6, 0.6, 0.6, 0.6, 0.4, 0.4, 0.4, 0.4]);
        (templates, velocities, line_strengths)
    }

    #[test]
    fn exact_model_has_zero_residual() {
        let (templates, v, lf) = two_star_setup();
        let obs = synthetic_observations(&templates, &v, &lf);
        let chi = residual(&obs, &v, &[0.01; 4], &lf).unwrap();
        assert!(chi < 1e-12, "chi = {chi}");
    }

    #[test]
    fn wrong_velocities_increase_residual() {
        let (templates, v, lf) = two_star_setup();
        let obs = synthetic_observations(&templates, &v, &lf);
        let mut wrong = v.clone();
        for j in 0..4 {
            wrong[(0, j)] *= 0.5;
        }
        let good = residual(&obs, &v, &[0.01; 4], &lf).unwrap();
        let bad = residual(&obs, &wrong, &[0.01; 4], &lf).unwrap();
        assert!(bad > good + 1.0, "good = {good}, bad = {bad}");
    }

    #[test]
    fn no_components_gives_weighted_power() {
        // Parseval: Σ_t x_t² / σ² for every epoch.
        let n = 7;
        let x: Vec<f64> = (0..n).map(|i| (i as f64 * 0.9).sin() + 0.3).collect();
        let y: Vec<f64> = (0..n).map(|i| (i as f64 * 0.4).cos()).collect();
        let coefficients = DMatrix::from_fn(2, n / 2 + 1, |j, mode| {
            if j == 0 { real_dft(&x)[mode] } else { real_dft(&y)[mode] }
        });
        let obs = FourierSpectra {
            bins: n,
            coefficients,
        };
        let sigmas = [0.5, 2.0];
        let empty = DMatrix::<f64>::zeros(0, 2);

        let chi = residual(&obs, &empty, &sigmas, &empty).unwrap();
        let expected: f64 = x.iter().map(|v| v * v / 0.25).sum::<f64>()
            + y.iter().map(|v| v * v / 4.0).sum::<f64>();
        assert_abs_diff_eq!(chi, expected, epsilon = 1e-9);
    }

    #[test]
    fn parseval_holds_for_even_length() {
        let n = 8;
        let x: Vec<f64> = (0..n).map(|i| ((i * i) % 5) as f64 - 1.5).collect();
        let coefficients = DMatrix::from_fn(1, n / 2 + 1, |_, mode| real_dft(&x)[mode]);
        let obs = FourierSpectra {
            bins: n,
            coefficients,
        };
        let empty = DMatrix::<f64>::zeros(0, 1);
        let chi = residual(&obs, &empty, &[1.0], &empty).unwrap();
        let expected: f64 = x.iter().map(|v| v * v).sum();
        assert_abs_diff_eq!(chi, expected, epsilon = 1e-9);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let (templates, v, lf) = two_star_setup();
        let obs = synthetic_observations(&templates, &v, &lf);
        assert!(residual(&obs, &v, &[0.01; 3], &lf).is_err());
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let (templates, v, lf) = two_star_setup();
        let obs = synthetic_observations(&templates, &v, &lf);
        let mut shifted = v.clone();
        shifted[(1, 2)] += 0.7;
        let a = residual(&obs, &shifted, &[0.02; 4], &lf).unwrap();
        let b = residual(&obs, &shifted, &[0.02; 4], &lf).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
