//! Chi-square surface export (JSON).
//!
//! The text stream on stdout is the primary output; this file carries the same
//! grid as a `k1s × k2s` matrix plus run metadata, convenient for plotting.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Component, GridRecord};
use crate::error::AppError;
use crate::fit::GridAxes;
use crate::io::setup::RunSetup;

/// Schema of the exported surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceFile {
    pub tool: String,
    /// RFC 3339 timestamp of the export.
    pub generated: String,
    pub base_name: String,
    pub window: (f64, f64),
    /// km/s per bin.
    pub rv_step: f64,
    pub components: Vec<String>,
    pub epochs: usize,
    pub bins: usize,
    pub k1s: Vec<f64>,
    pub k2s: Vec<f64>,
    /// `chisq[i][j]` belongs to `(k1s[i], k2s[j])`.
    pub chisq: Vec<Vec<f64>>,
}

/// Collects streamed grid records into a dense surface.
#[derive(Debug, Clone)]
pub struct ChisqSurface {
    k1s: Vec<f64>,
    k2s: Vec<f64>,
    values: Vec<f64>,
}

impl ChisqSurface {
    pub fn new(axes: &GridAxes) -> Self {
        Self {
            k1s: axes.rv_a.clone(),
            k2s: axes.rv_b.clone(),
            values: Vec::with_capacity(axes.len()),
        }
    }

    /// Records must arrive in row-major order.
    pub fn push(&mut self, record: &GridRecord) {
        self.values.push(record.chisq);
    }

    pub fn is_complete(&self) -> bool {
        self.values.len() == self.k1s.len() * self.k2s.len()
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.values
            .chunks(self.k2s.len().max(1))
            .map(<[f64]>::to_vec)
            .collect()
    }

    /// Grid point with the smallest chi-square.
    pub fn minimum(&self) -> Option<GridRecord> {
        let nb = self.k2s.len();
        self.values
            .iter()
            .enumerate()
            .min_by(|(_, x), (_, y)| x.total_cmp(y))
            .map(|(index, &chisq)| GridRecord {
                rv_a: self.k1s[index / nb],
                rv_b: self.k2s[index % nb],
                chisq,
            })
    }

    pub fn into_file(self, setup: &RunSetup) -> SurfaceFile {
        let chisq = self.rows();
        SurfaceFile {
            tool: env!("CARGO_PKG_NAME").to_string(),
            generated: chrono::Local::now().to_rfc3339(),
            base_name: setup.base_name.clone(),
            window: setup.window,
            rv_step: setup.spectra.rv_step(),
            components: setup.components.iter().map(component_label).collect(),
            epochs: setup.spectra.epochs(),
            bins: setup.spectra.bins(),
            k1s: self.k1s,
            k2s: self.k2s,
            chisq,
        }
    }
}

fn component_label(component: Component) -> String {
    format!("{component:?}")
}

/// Write a surface JSON file.
pub fn write_surface_json(path: &Path, surface: &SurfaceFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("failed to create '{}'", path.display()), e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), surface).map_err(|e| {
        AppError::io(
            format!("failed to write '{}'", path.display()),
            std::io::Error::other(e),
        )
    })
}
