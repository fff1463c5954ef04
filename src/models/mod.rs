//! Orbital radial-velocity model.
//!
//! Kept as a pure function of (parameters, time) so the merit function can
//! call it from any worker thread.

pub mod triorb;

pub use triorb::*;
