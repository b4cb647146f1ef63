//! The arithmetic core of the Reckon calculator API.
//!
//! This crate provides the closed [`Operation`] enumeration, the
//! [`Calculator`] trait and the stateless [`StandardCalculator`] that
//! evaluates two operands against an operation. Nothing here performs I/O:
//! the HTTP boundary in `reckon-api` owns extraction, defaults and response
//! shaping.

pub mod calculator;
pub mod error;
pub mod operation;

pub use calculator::{CalculationResult, Calculator, StandardCalculator};
pub use error::CalculatorError;
pub use operation::Operation;

/// Evaluates `left <operation> right` with the [`StandardCalculator`].
pub fn evaluate(left: f64, right: f64, operation: Operation) -> CalculationResult {
    StandardCalculator.evaluate(left, right, operation)
}

/// `left * right + (left + right)`.
pub fn multiply_then_add(left: f64, right: f64) -> CalculationResult {
    StandardCalculator.multiply_then_add(left, right)
}

/// `(left + right) + (left - right)`.
pub fn add_subtract_add(left: f64, right: f64) -> CalculationResult {
    StandardCalculator.add_subtract_add(left, right)
}
