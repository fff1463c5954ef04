//! Complex least squares solver.
//!
//! The disentangling residual solves, for every Fourier mode, a small
//! overdetermined system
//!
//! ```text
//! minimize ‖A x - b‖²,   A: epochs × components (complex)
//! ```
//!
//! SVD keeps this robust when the system is tall or rank deficient (at the
//! zero-frequency mode every column is a pure light-factor vector, so the
//! components cannot be told apart). Singular values below a cut-off relative
//! to the largest one are treated as zero, which gives the minimum-norm
//! solution and leaves the residual well defined.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

/// Relative singular-value cut-off.
const RCOND: f64 = 1e-12;

/// Solve a complex least squares problem using SVD.
///
/// Returns `None` if the inputs or the solution contain non-finite values.
pub fn solve_complex_least_squares(
    a: &DMatrix<Complex64>,
    b: &DVector<Complex64>,
) -> Option<DVector<Complex64>> {
    // The SVD iteration panics on NaN.
    if !(a.iter().all(is_finite) && b.iter().all(is_finite)) {
        return None;
    }
    let svd = a.clone().svd(true, true);
    let largest = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let tol = (largest * RCOND).max(f64::MIN_POSITIVE);

    let x = svd.solve(b, tol).ok()?;
    x.iter().all(is_finite).then_some(x)
}

fn is_finite(c: &Complex64) -> bool {
    c.re.is_finite() && c.im.is_finite()
}

/// Squared norm of `b - A x`.
pub fn residual_norm_squared(
    a: &DMatrix<Complex64>,
    x: &DVector<Complex64>,
    b: &DVector<Complex64>,
) -> f64 {
    (b - a * x).iter().map(|c| c.norm_sqr()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn solves_consistent_complex_system() {
        // b = A x with x = [1 - i, 2 + 0.5i]
        let a = DMatrix::from_row_slice(
            3,
            2,
            &[c(1.0, 0.0), c(0.0, 1.0), c(2.0, -1.0), c(1.0, 0.0), c(0.5, 0.5), c(-1.0, 2.0)],
        );
        let x_true = DVector::from_vec(vec![c(1.0, -1.0), c(2.0, 0.5)]);
        let b = &a * &x_true;

        let x = solve_complex_least_squares(&a, &b).unwrap();
        for (got, want) in x.iter().zip(x_true.iter()) {
            assert_abs_diff_eq!(got.re, want.re, epsilon = 1e-10);
            assert_abs_diff_eq!(got.im, want.im, epsilon = 1e-10);
        }
        assert_abs_diff_eq!(residual_norm_squared(&a, &x, &b), 0.0, epsilon = 1e-20);
    }

    #[test]
    fn rank_deficient_columns_still_give_a_residual() {
        // Two identical columns: only their sum is determined.
        let a = DMatrix::from_row_slice(2, 2, &[c(1.0, 0.0), c(1.0, 0.0), c(2.0, 0.0), c(2.0, 0.0)]);
        let b = DVector::from_vec(vec![c(1.0, 0.0), c(3.0, 0.0)]);

        let x = solve_complex_least_squares(&a, &b).unwrap();
        // Best fit of [1, 3] by s * [1, 2] is s = 7/5, residual [-0.4, 0.2].
        assert_abs_diff_eq!((x[0] + x[1]).re, 1.4, epsilon = 1e-10);
        assert_abs_diff_eq!(residual_norm_squared(&a, &x, &b), 0.2, epsilon = 1e-10);
    }

    #[test]
    fn non_finite_inputs_are_refused() {
        let a = DMatrix::from_row_slice(2, 1, &[c(f64::NAN, 0.0), c(1.0, 0.0)]);
        let b = DVector::from_vec(vec![c(1.0, 0.0), c(2.0, 0.0)]);
        assert!(solve_complex_least_squares(&a, &b).is_none());

        let a = DMatrix::from_row_slice(2, 1, &[c(1.0, 0.0), c(1.0, 0.0)]);
        let b = DVector::from_vec(vec![c(1.0, f64::INFINITY), c(2.0, 0.0)]);
        assert!(solve_complex_least_squares(&a, &b).is_none());
    }
}
