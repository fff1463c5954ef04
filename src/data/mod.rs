//! Observed spectra: the full matrix, its wavelength window and the cached
//! Fourier transforms.

pub mod fourier;
pub mod spectrum;

pub use fourier::*;
pub use spectrum::*;
