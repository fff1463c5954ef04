//! Run configuration from the input stream.
//!
//! Values are read in a fixed order:
//!
//! 1. base name of the observation file (`<base>.obs` is loaded)
//! 2. wavelength window `z0 z1` (natural log of wavelength)
//! 3. three component switches (A, B, C)
//! 4. for each epoch: time, RV correction, sigma, then one line strength per
//!    enabled component
//! 5. eleven fixed orbital elements
//! 6. grid bounds `lowA highA stepA lowB highB stepB`
//!
//! The number of epochs comes from the observation file, so it is loaded as
//! soon as its name is known.

use std::io::BufRead;
use std::path::PathBuf;

use log::info;
use nalgebra::DMatrix;

use crate::data::spectrum::{ObservedSpectra, WindowedSpectra};
use crate::domain::{AxisBounds, EnabledComponents, EpochTable, FixedElements, GridBounds};
use crate::error::AppError;
use crate::io::tokens::TokenReader;

/// Extension of the observation file next to the base name.
pub const OBS_EXTENSION: &str = "obs";

/// Everything read before the scan starts.
#[derive(Debug, Clone)]
pub struct RunSetup {
    pub base_name: String,
    pub window: (f64, f64),
    pub spectra: WindowedSpectra,
    pub components: EnabledComponents,
    pub epochs: EpochTable,
    /// Components × epochs.
    pub line_strengths: DMatrix<f64>,
    pub elements: FixedElements,
    pub bounds: GridBounds,
}

pub fn obs_path(base_name: &str) -> PathBuf {
    PathBuf::from(format!("{base_name}.{OBS_EXTENSION}"))
}

/// Read a complete run configuration and load the observations it names.
pub fn read_run_setup<R: BufRead>(tokens: &mut TokenReader<R>) -> Result<RunSetup, AppError> {
    let base_name = tokens.read_word()?;
    let path = obs_path(&base_name);
    let observed = ObservedSpectra::load(&path)?;
    info!(
        "Loaded {}: {} bins, {} epochs, {:.4} km/s per bin",
        path.display(),
        observed.bins(),
        observed.epochs(),
        observed.rv_step()
    );

    let z0 = tokens.read_finite_f64("window start")?;
    let z1 = tokens.read_finite_f64("window end")?;
    let spectra = observed.into_window(z0, z1)?;
    info!(
        "Window [{z0}, {z1}] keeps bins {}..={} ({} bins)",
        spectra.first_bin,
        spectra.last_bin,
        spectra.bins()
    );

    let mut flags = [false; 3];
    for flag in &mut flags {
        *flag = tokens.read_flag()?;
    }
    let components = EnabledComponents::from_flags(flags);
    info!("Disentangling {} components: {:?}", components.count(), components);

    let m = spectra.epochs();
    let k = components.count();
    let mut epochs = EpochTable::with_capacity(m);
    let mut line_strengths = DMatrix::<f64>::zeros(k, m);
    for j in 0..m {
        let time = tokens.read_finite_f64("epoch time")?;
        let rv_correction = tokens.read_finite_f64("RV correction")?;
        let sigma = tokens.read_finite_f64("sigma")?;
        epochs.push(time, rv_correction, sigma)?;
        for c in 0..k {
            line_strengths[(c, j)] = tokens.read_finite_f64("line strength")?;
        }
    }

    let mut values = [0.0; FixedElements::COUNT];
    for v in &mut values {
        *v = tokens.read_finite_f64("orbital element")?;
    }
    let elements = FixedElements::from_values(values);

    let mut axis = || -> Result<AxisBounds, AppError> {
        Ok(AxisBounds {
            low: tokens.read_finite_f64("grid bound")?,
            high: tokens.read_finite_f64("grid bound")?,
            step: tokens.read_finite_f64("grid step")?,
        })
    };
    let a = axis()?;
    let b = axis()?;

    Ok(RunSetup {
        base_name,
        window: (z0, z1),
        spectra,
        components,
        epochs,
        line_strengths,
        elements,
        bounds: GridBounds { a, b },
    })
}
