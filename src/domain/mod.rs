//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - stellar components and their enable flags (`Component`, `EnabledComponents`)
//! - per-epoch metadata (`EpochTable`)
//! - fixed orbital elements and their mapping to the velocity model (`FixedElements`)
//! - grid bounds and output records (`AxisBounds`, `GridBounds`, `GridRecord`)

pub mod types;

pub use types::*;
