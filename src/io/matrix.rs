//! Plain-text numeric matrix files.
//!
//! One matrix row per line, values separated by whitespace. Blank lines and
//! lines starting with `#` are skipped. All rows must have the same width.

use std::fs;
use std::path::Path;

use nalgebra::DMatrix;

use crate::error::AppError;

/// Load a text matrix from disk.
pub fn load_matrix(path: &Path) -> Result<DMatrix<f64>, AppError> {
    let text = fs::read_to_string(path).map_err(|e| AppError::load(path, e.to_string()))?;
    parse_matrix(&text).map_err(|detail| AppError::load(path, detail))
}

/// Parse matrix text; the error string carries the offending line number.
pub fn parse_matrix(text: &str) -> Result<DMatrix<f64>, String> {
    let mut values = Vec::new();
    let mut ncols: Option<usize> = None;
    let mut nrows = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let start = values.len();
        for token in line.split_whitespace() {
            let v = token
                .parse::<f64>()
                .map_err(|_| format!("line {line_no}: invalid number '{token}'"))?;
            values.push(v);
        }
        let width = values.len() - start;

        match ncols {
            None => ncols = Some(width),
            Some(expected) if expected != width => {
                return Err(format!(
                    "line {line_no}: expected {expected} columns, found {width}"
                ));
            }
            Some(_) => {}
        }
        nrows += 1;
    }

    let Some(ncols) = ncols else {
        return Err("no data rows".to_string());
    };

    Ok(DMatrix::from_row_slice(nrows, ncols, &values))
}
