//! Grid-search orchestration.
//!
//! Responsibilities:
//!
//! - build the rvA / rvB sample axes
//! - evaluate the merit function at each grid point (parallel)
//! - score each point by the Fourier-space disentangling residual

pub mod disentangle;
pub mod grid;
pub mod merit;

pub use grid::*;
pub use merit::*;
