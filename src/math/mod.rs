//! Mathematical utilities: real DFT, Kepler's equation and complex least squares.

pub mod dft;
pub mod kepler;
pub mod lstsq;

pub use dft::*;
pub use kepler::*;
pub use lstsq::*;
