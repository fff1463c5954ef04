//! Forward discrete Fourier transform of real signals.
//!
//! ```text
//! X_n = Σ_t x_t exp(-2πi n t / N),   n = 0..=N/2
//! ```
//!
//! Only the non-negative half of the spectrum is returned (`N/2 + 1`
//! coefficients, i.e. `2*(N/2 + 1)` packed reals); the rest follows from
//! conjugate symmetry. The transform runs once per run, so a direct sum with
//! a shared twiddle table is fast enough.

use std::f64::consts::TAU;

use num_complex::Complex64;

/// Number of complex coefficients kept for a real signal of length `n`.
pub fn half_spectrum_len(n: usize) -> usize {
    n / 2 + 1
}

/// Unit roots `exp(-2πi m / n)` for `m = 0..n`.
pub fn twiddles(n: usize) -> Vec<Complex64> {
    (0..n)
        .map(|m| Complex64::from_polar(1.0, -TAU * m as f64 / n as f64))
        .collect()
}

/// Forward DFT of a real signal using a precomputed twiddle table.
///
/// Indices into the table are reduced modulo `n`, which keeps the phases
/// exact for long signals.
pub fn real_dft_with(signal: &[f64], twiddles: &[Complex64]) -> Vec<Complex64> {
    let n = signal.len();
    debug_assert_eq!(twiddles.len(), n);

    (0..half_spectrum_len(n))
        .map(|k| {
            let mut acc = Complex64::new(0.0, 0.0);
            let mut m = 0usize;
            for &x in signal {
                acc += twiddles[m] * x;
                m += k;
                if m >= n {
                    m -= n;
                }
            }
            acc
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn real_dft(signal: &[f64]) -> Vec<Complex64> {
    real_dft_with(signal, &twiddles(signal.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn half_length_is_floor_plus_one() {
        assert_eq!(half_spectrum_len(8), 5);
        assert_eq!(half_spectrum_len(7), 4);
        assert_eq!(half_spectrum_len(1), 1);
    }

    #[test]
    fn constant_signal_has_only_dc() {
        let x = vec![2.0; 6];
        let spectrum = real_dft(&x);
        assert_eq!(spectrum.len(), 4);
        assert_abs_diff_eq!(spectrum[0].re, 12.0, epsilon = 1e-12);
        for c in &spectrum[1..] {
            assert_abs_diff_eq!(c.norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn cosine_lands_in_its_bin() {
        let n = 16;
        let x: Vec<f64> = (0..n)
            .map(|t| (TAU * 3.0 * t as f64 / n as f64).cos())
            .collect();
        let spectrum = real_dft(&x);
        for (k, c) in spectrum.iter().enumerate() {
            let expected = if k == 3 { n as f64 / 2.0 } else { 0.0 };
            assert_abs_diff_eq!(c.re, expected, epsilon = 1e-9);
            assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn matches_defining_sum() {
        let x = [0.3, -1.2, 4.0, 0.5, 2.2, -0.7, 1.1];
        let n = x.len();
        let spectrum = real_dft(&x);
        for (k, c) in spectrum.iter().enumerate() {
            let mut direct = Complex64::new(0.0, 0.0);
            for (t, &v) in x.iter().enumerate() {
                direct += Complex64::from_polar(v, -TAU * (k * t) as f64 / n as f64);
            }
            assert_abs_diff_eq!(c.re, direct.re, epsilon = 1e-10);
            assert_abs_diff_eq!(c.im, direct.im, epsilon = 1e-10);
        }
    }
}
