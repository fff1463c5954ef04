//! Text output of the grid scan.
//!
//! One header line, then one `rvA rvB chisq` line per grid point. Each line is
//! flushed as soon as it is written so partial results survive an abort.

use std::io::Write;

use crate::domain::GridRecord;
use crate::error::AppError;

/// Ends with a space.
pub const HEADER: &str = "k1 k2 chisq ";

pub fn format_record(record: &GridRecord) -> String {
    format!("{:.5} {:.5} {:.5}", record.rv_a, record.rv_b, record.chisq)
}

/// Line-flushed writer for the chi-square stream.
pub struct SurfaceWriter<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> SurfaceWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn write_header(&mut self) -> Result<(), AppError> {
        self.line(HEADER)
    }

    pub fn write_record(&mut self, record: &GridRecord) -> Result<(), AppError> {
        self.line(&format_record(record))?;
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    fn line(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.out, "{text}")
            .and_then(|()| self.out.flush())
            .map_err(|e| AppError::io("failed writing output", e))
    }
}
