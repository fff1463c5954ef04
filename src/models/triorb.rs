//! Radial velocities in a hierarchical triple system.
//!
//! The tight pair (A, B) orbits its own centre of mass, which in turn moves
//! on a wide orbit together with the third body C:
//!
//! ```text
//! rv_A = K_AB f_wide(t) + K_A f_tight(t)
//! rv_B = K_AB f_wide(t) - K_B f_tight(t)
//! rv_C =                - K_C f_wide(t)
//!
//! f(t) = cos(ν(t) + ω) + e cos ω
//! ```
//!
//! Velocities come out in whatever unit the semi-amplitudes are given in.
//! Angles are in radians. An orbit whose period is exactly zero is treated as
//! absent and contributes no velocity.

use std::f64::consts::TAU;

use crate::error::AppError;
use crate::math::kepler::{eccentric_anomaly, true_anomaly};

/// Shape and timing of one Keplerian orbit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orbit {
    /// Period in days.
    pub period: f64,
    /// Time of periastron passage in days.
    pub periastron_time: f64,
    pub eccentricity: f64,
    /// Longitude of periastron in radians.
    pub periastron_longitude: f64,
}

impl Orbit {
    pub fn is_absent(&self) -> bool {
        self.period == 0.0
    }

    fn validate(&self, name: &str) -> Result<(), AppError> {
        if !self.period.is_finite() || self.period < 0.0 {
            return Err(AppError::domain(format!(
                "{name} orbit period must be finite and non-negative, got {}",
                self.period
            )));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(AppError::domain(format!(
                "{name} orbit eccentricity must lie in [0, 1), got {}",
                self.eccentricity
            )));
        }
        Ok(())
    }

    /// Phase since periastron in units of whole cycles.
    fn cycles_since_periastron(&self, t: f64) -> f64 {
        (t - self.periastron_time) / self.period
    }

    /// `cos(ν + ω) + e cos ω` at time `t` for the given periastron longitude.
    fn velocity_factor(&self, t: f64, omega: f64) -> Result<f64, AppError> {
        let mean_anomaly = TAU * self.cycles_since_periastron(t);
        let e = self.eccentricity;
        let big_e = eccentric_anomaly(mean_anomaly, e)?;
        let nu = true_anomaly(big_e, e);
        Ok((nu + omega).cos() + e * omega.cos())
    }
}

/// Full parameter set of the triple-system velocity model.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriorbParams {
    pub wide: Orbit,
    /// Semi-amplitude of the AB centre of mass on the wide orbit.
    pub amplitude_ab: f64,
    /// Semi-amplitude of C on the wide orbit.
    pub amplitude_c: f64,
    pub tight: Orbit,
    /// Semi-amplitude of A on the tight orbit.
    pub amplitude_a: f64,
    /// Semi-amplitude of B on the tight orbit.
    pub amplitude_b: f64,
    /// Advance of the tight orbit's periastron longitude per cycle, radians.
    pub apsidal_advance: f64,
}

impl TriorbParams {
    /// Radial velocities of A, B and C at time `t`.
    pub fn radial_velocities(&self, t: f64) -> Result<[f64; 3], AppError> {
        self.wide.validate("wide")?;
        self.tight.validate("tight")?;

        let f_wide = if self.wide.is_absent() {
            0.0
        } else {
            self.wide.velocity_factor(t, self.wide.periastron_longitude)?
        };

        let f_tight = if self.tight.is_absent() {
            0.0
        } else {
            let omega = self.tight.periastron_longitude
                + self.apsidal_advance * self.tight.cycles_since_periastron(t);
            self.tight.velocity_factor(t, omega)?
        };

        let v_ab = self.amplitude_ab * f_wide;
        Ok([
            v_ab + self.amplitude_a * f_tight,
            v_ab - self.amplitude_b * f_tight,
            -self.amplitude_c * f_wide,
        ])
    }
}
