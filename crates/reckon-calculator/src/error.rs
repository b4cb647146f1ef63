//! Error types raised by the calculator.

use thiserror::Error;

/// Failures the dispatcher can signal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    /// The right operand of a division was zero.
    #[error("Cannot divide by zero.")]
    DivisionByZero,

    /// A value could not be mapped onto one of the four operations.
    #[error("Unsupported calculator operation: '{value}'")]
    InvalidOperation { value: String },
}

impl CalculatorError {
    /// Create an invalid operation error for the offending input.
    pub fn invalid_operation(value: impl Into<String>) -> Self {
        Self::InvalidOperation { value: value.into() }
    }

    /// Stable machine-readable code for API payloads.
    pub fn error_code(&self) -> &'static str {
        match self {
            CalculatorError::DivisionByZero => "DIVISION_BY_ZERO",
            CalculatorError::InvalidOperation { .. } => "INVALID_OPERATION",
        }
    }
}
