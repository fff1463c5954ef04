//! Strict sequential reads from the configuration stream.
//!
//! The stream is a flat sequence of whitespace-separated tokens; line breaks
//! carry no meaning. Values must appear in exactly the order the loader asks
//! for them, and a missing or malformed token ends the run.

use std::collections::VecDeque;
use std::io::BufRead;

use crate::error::AppError;

/// Whitespace tokenizer over a buffered reader.
///
/// Lines are pulled lazily, so a pipe can feed configuration incrementally.
pub struct TokenReader<R> {
    reader: R,
    pending: VecDeque<String>,
    consumed: usize,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            consumed: 0,
        }
    }

    /// Number of tokens handed out so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn next_token(&mut self, what: &'static str) -> Result<String, AppError> {
        while self.pending.is_empty() {
            let mut line = String::new();
            let n = self
                .reader
                .read_line(&mut line)
                .map_err(|e| AppError::read(what, format!("input stream error: {e}")))?;
            if n == 0 {
                return Err(AppError::read(
                    what,
                    format!("unexpected end of input after {} values", self.consumed),
                ));
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }

        self.consumed += 1;
        // Non-empty by the loop above.
        self.pending
            .pop_front()
            .ok_or_else(|| AppError::read(what, "unexpected end of input"))
    }

    pub fn read_f64(&mut self) -> Result<f64, AppError> {
        let token = self.next_token("double")?;
        token.parse::<f64>().map_err(|_| {
            AppError::read(
                "double",
                format!("invalid token '{token}' at position {}", self.consumed),
            )
        })
    }

    /// A double that must be finite. `name` labels the value in the error.
    pub fn read_finite_f64(&mut self, name: &str) -> Result<f64, AppError> {
        let value = self.read_f64()?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(AppError::domain(format!(
                "{name} must be finite, got {value} at position {}",
                self.consumed
            )))
        }
    }

    pub fn read_int(&mut self) -> Result<i64, AppError> {
        let token = self.next_token("int")?;
        token.parse::<i64>().map_err(|_| {
            AppError::read(
                "int",
                format!("invalid token '{token}' at position {}", self.consumed),
            )
        })
    }

    /// Integer read interpreted as a switch: any non-zero value is on.
    pub fn read_flag(&mut self) -> Result<bool, AppError> {
        Ok(self.read_int()? != 0)
    }

    pub fn read_word(&mut self) -> Result<String, AppError> {
        self.next_token("string")
    }
}
