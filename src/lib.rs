//! `gridfd3` library crate.
//!
//! Maps the chi-square of Fourier-space spectral disentangling over a grid of
//! tight-orbit semi-amplitudes (rvA, rvB) of a hierarchical triple.
//!
//! The binary (`gridfd3`) is a thin wrapper around this library so that the
//! core logic is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
