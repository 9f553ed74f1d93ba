//! Error taxonomy for the calculator pipeline.
//!
//! Validation, ephemeris and timeout failures are fatal to the batch that
//! raised them. Grading failures are not: the orchestrator logs them and
//! returns the report without a diagnostic.

use serde::Serialize;
use thiserror::Error;

/// Errors raised by time conversion, validation, the ephemeris port,
/// the orchestrator timeout, or the grading engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    /// Date/time string failed to parse or the IANA zone is unrecognized.
    #[error("invalid civil time: {0}")]
    InvalidCivilTime(String),
    /// Malformed or out-of-range calculator input, detected before any
    /// computation runs.
    #[error("{0}")]
    Validation(String),
    /// The ephemeris engine is not initialized or a query failed.
    #[error("ephemeris unavailable: {0}")]
    EphemerisUnavailable(String),
    /// The orchestrator's global timeout elapsed before the batch settled.
    #[error("calculator timeout: exceeded the configured deadline")]
    Timeout,
    /// The diagnostic grading step failed after the calculators succeeded.
    #[error("diagnostic grading failed: {0}")]
    Grading(String),
}

impl CalculationError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// One failed calculator in a consolidated report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatorError {
    pub calculator_name: String,
    pub error_message: String,
}

impl CalculatorError {
    pub fn new(calculator_name: impl Into<String>, error: &CalculationError) -> Self {
        CalculatorError {
            calculator_name: calculator_name.into(),
            error_message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = CalculationError::InvalidCivilTime("bad zone".into());
        assert_eq!(err.to_string(), "invalid civil time: bad zone");
    }

    #[test]
    fn validation_passes_message_through() {
        let err = CalculationError::validation("Month must be 1-12");
        assert_eq!(err.to_string(), "Month must be 1-12");
    }

    #[test]
    fn calculator_error_captures_name_and_message() {
        let err = CalculatorError::new("natalChart", &CalculationError::Timeout);
        assert_eq!(err.calculator_name, "natalChart");
        assert!(err.error_message.contains("timeout"));
    }
}
