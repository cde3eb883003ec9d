//! Error types for the calibration pipeline.
//!
//! Only structural problems are surfaced as errors: a broken input
//! schema, an inconsistent depth-pair configuration, or a phase result
//! that falls outside the table's configured range. Insufficient or
//! degenerate observation data never raises an error; it degrades to
//! an invalid model marker in the output table instead.

use std::fmt;

use crate::types::Phase;

/// Structural failures that abort a calibration run.
#[derive(Debug)]
pub enum CalibrationError {
    /// A required column is absent from the input header.
    MissingColumn(&'static str),
    /// An input row could not be parsed.
    MalformedRow { line: usize, reason: String },
    /// The depth-pair catalogue or phase range violates an invariant.
    InvalidConfig(String),
    /// A phase result does not fit the configured table range.
    PhaseOutOfRange { phase: Phase, min: Phase, max: Phase },
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::MissingColumn(name) => {
                write!(f, "input is missing required column '{name}'")
            }
            CalibrationError::MalformedRow { line, reason } => {
                write!(f, "malformed input row at line {line}: {reason}")
            }
            CalibrationError::InvalidConfig(reason) => {
                write!(f, "invalid calibration config: {reason}")
            }
            CalibrationError::PhaseOutOfRange { phase, min, max } => {
                write!(
                    f,
                    "phase {phase} outside configured table range {min}..={max}"
                )
            }
        }
    }
}

impl std::error::Error for CalibrationError {}

pub type Result<T> = std::result::Result<T, CalibrationError>;
