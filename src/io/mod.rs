//! Input/output helpers.
//!
//! - whitespace token stream on the input (`tokens`)
//! - numeric matrix files (`matrix`)
//! - run configuration reader (`setup`)
//! - chi-square surface JSON (`export`)

pub mod export;
pub mod matrix;
pub mod setup;
pub mod tokens;

pub use export::*;
pub use matrix::*;
pub use setup::*;
pub use tokens::*;
