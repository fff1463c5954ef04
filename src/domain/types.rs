//! Shared domain types.
//!
//! These are the values the loader reads from the configuration stream and
//! the driver hands to the merit function. Output types are serializable so
//! the surface can be exported.

use serde::Serialize;

use crate::error::AppError;
use crate::models::triorb::{Orbit, TriorbParams};

/// One of the three stars the velocity model knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Component {
    A,
    B,
    C,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::A, Component::B, Component::C];

    /// Slot of this component in the velocity model's output.
    pub fn index(self) -> usize {
        match self {
            Component::A => 0,
            Component::B => 1,
            Component::C => 2,
        }
    }
}

/// The components switched on for this run, in A, B, C order.
///
/// Row `k` of the line-strength and model-velocity matrices belongs to the
/// `k`-th entry here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EnabledComponents(Vec<Component>);

impl EnabledComponents {
    pub fn from_flags(flags: [bool; 3]) -> Self {
        Self(
            Component::ALL
                .into_iter()
                .zip(flags)
                .filter_map(|(c, on)| on.then_some(c))
                .collect(),
        )
    }

    pub fn count(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Component> + '_ {
        self.0.iter().copied()
    }
}

/// Per-epoch observation metadata, stored column-wise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpochTable {
    /// Observation times in days.
    pub times: Vec<f64>,
    /// Barycentric/instrumental RV corrections in km/s.
    pub rv_corrections: Vec<f64>,
    /// Flux uncertainties.
    pub sigmas: Vec<f64>,
}

impl EpochTable {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            times: Vec::with_capacity(n),
            rv_corrections: Vec::with_capacity(n),
            sigmas: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn push(&mut self, time: f64, rv_correction: f64, sigma: f64) -> Result<(), AppError> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(AppError::domain(format!(
                "sigma of epoch {} must be finite and positive, got {sigma}",
                self.len()
            )));
        }
        self.times.push(time);
        self.rv_corrections.push(rv_correction);
        self.sigmas.push(sigma);
        Ok(())
    }
}

/// Orbital elements held fixed over the whole grid.
///
/// Read from the configuration stream as 11 values in field order. Angles
/// arrive in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FixedElements {
    pub wide_period: f64,
    pub wide_periastron_time: f64,
    pub wide_eccentricity: f64,
    pub wide_periastron_longitude_deg: f64,
    pub wide_amplitude_ab: f64,
    pub wide_amplitude_c: f64,
    pub tight_period: f64,
    pub tight_periastron_time: f64,
    pub tight_eccentricity: f64,
    pub tight_periastron_longitude_deg: f64,
    pub apsidal_advance_deg: f64,
}

impl FixedElements {
    pub const COUNT: usize = 11;

    pub fn from_values(v: [f64; Self::COUNT]) -> Self {
        Self {
            wide_period: v[0],
            wide_periastron_time: v[1],
            wide_eccentricity: v[2],
            wide_periastron_longitude_deg: v[3],
            wide_amplitude_ab: v[4],
            wide_amplitude_c: v[5],
            tight_period: v[6],
            tight_periastron_time: v[7],
            tight_eccentricity: v[8],
            tight_periastron_longitude_deg: v[9],
            apsidal_advance_deg: v[10],
        }
    }

    /// Velocity-model parameters for one grid point.
    ///
    /// Angles are converted to radians. The tight-orbit semi-amplitudes
    /// `rv_a`, `rv_b` (km/s) are divided by `rv_step` so the model works in
    /// bins. The wide-orbit semi-amplitudes are passed through as given.
    pub fn to_triorb(&self, rv_a: f64, rv_b: f64, rv_step: f64) -> TriorbParams {
        TriorbParams {
            wide: Orbit {
                period: self.wide_period,
                periastron_time: self.wide_periastron_time,
                eccentricity: self.wide_eccentricity,
                periastron_longitude: self.wide_periastron_longitude_deg.to_radians(),
            },
            amplitude_ab: self.wide_amplitude_ab,
            amplitude_c: self.wide_amplitude_c,
            tight: Orbit {
                period: self.tight_period,
                periastron_time: self.tight_periastron_time,
                eccentricity: self.tight_eccentricity,
                periastron_longitude: self.tight_periastron_longitude_deg.to_radians(),
            },
            amplitude_a: rv_a / rv_step,
            amplitude_b: rv_b / rv_step,
            apsidal_advance: self.apsidal_advance_deg.to_radians(),
        }
    }
}

/// Lower bound, upper bound and step of one grid axis, in km/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisBounds {
    pub low: f64,
    pub high: f64,
    pub step: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridBounds {
    pub a: AxisBounds,
    pub b: AxisBounds,
}

/// One evaluated grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridRecord {
    pub rv_a: f64,
    pub rv_b: f64,
    pub chisq: f64,
}
