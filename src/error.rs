use std::path::PathBuf;

use thiserror::Error;

/// Marker printed in front of every fatal diagnostic.
pub const ERROR_MARKER: &str = "Error in gridfd3";

/// Every failure is fatal, so all variants share one exit code.
const FAILURE_EXIT_CODE: u8 = 1;

#[derive(Debug, Error)]
pub enum AppError {
    /// A value expected on the input stream is missing or malformed.
    #[error("failed reading {what}: {detail}")]
    Read { what: &'static str, detail: String },

    /// The spectral file is missing or malformed.
    #[error("failed loading '{}': {detail}", path.display())]
    Load { path: PathBuf, detail: String },

    /// Parameters outside the range the models can work with.
    #[error("{0}")]
    Domain(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    pub fn read(what: &'static str, detail: impl Into<String>) -> Self {
        Self::Read {
            what,
            detail: detail.into(),
        }
    }

    pub fn load(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            detail: detail.into(),
        }
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> u8 {
        FAILURE_EXIT_CODE
    }
}
