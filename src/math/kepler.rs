use std::f64::consts::{PI, TAU};

use roots::{SimpleConvergency, find_root_newton_raphson};

use crate::error::AppError;

/// Reduce an angle to `[0, 2π)`.
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(TAU)
}

/// Solve Kepler's equation `E - e sin E = M` for the eccentric anomaly.
pub fn eccentric_anomaly(mean_anomaly: f64, eccentricity: f64) -> Result<f64, AppError> {
    let m = principal_angle(mean_anomaly);
    let e = eccentricity;
    if e == 0.0 {
        return Ok(m);
    }

    let f = |x: f64| -> f64 { x - e * x.sin() - m };
    let df = |x: f64| -> f64 { 1.0 - e * x.cos() };

    // Starting at π converges for every e < 1; closer guesses are cheaper for
    // the usual low eccentricities.
    let x0 = if e < 0.8 { m + e * m.sin() } else { PI };

    let mut tol = SimpleConvergency {
        eps: 1e-12,
        max_iter: 60,
    };

    find_root_newton_raphson(x0, &f, &df, &mut tol).map_err(|e| {
        AppError::domain(format!(
            "Kepler equation did not converge (M = {m}, e = {eccentricity}): {e:?}"
        ))
    })
}

/// True anomaly from the eccentric anomaly.
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = eccentric_anomaly / 2.0;
    2.0 * ((1.0 + eccentricity).sqrt() * half.sin())
        .atan2((1.0 - eccentricity).sqrt() * half.cos())
}
