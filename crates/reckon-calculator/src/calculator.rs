use crate::error::CalculatorError;
use crate::operation::Operation;

pub type CalculationResult = Result<f64, CalculatorError>;

/// A trait for calculators.
/// Calculators are stateless and thread-safe.
pub trait Calculator: Send + Sync {
    /// Applies `operation` to the two operands.
    fn evaluate(&self, left: f64, right: f64, operation: Operation) -> CalculationResult;

    /// Sum of the product and the sum of both operands.
    fn multiply_then_add(&self, left: f64, right: f64) -> CalculationResult {
        let product = self.evaluate(left, right, Operation::Multiplication)?;
        let sum = self.evaluate(left, right, Operation::Addition)?;
        Ok(product + sum)
    }

    /// Sum of the sum and the difference of both operands.
    fn add_subtract_add(&self, left: f64, right: f64) -> CalculationResult {
        let sum = self.evaluate(left, right, Operation::Addition)?;
        let difference = self.evaluate(left, right, Operation::Subtraction)?;
        Ok(sum + difference)
    }
}

/// IEEE-754 arithmetic with a single guard against division by zero.
///
/// NaN, infinities and overflow are passed through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardCalculator;

impl StandardCalculator {
    pub fn new() -> Self {
        Self
    }

    fn divide(left: f64, right: f64) -> CalculationResult {
        // -0.0 compares equal to 0.0 and is rejected too
        if right == 0.0 {
            return Err(CalculatorError::DivisionByZero);
        }
        Ok(left / right)
    }
}

impl Calculator for StandardCalculator {
    fn evaluate(&self, left: f64, right: f64, operation: Operation) -> CalculationResult {
        match operation {
            Operation::Addition => Ok(left + right),
            Operation::Subtraction => Ok(left - right),
            Operation::Multiplication => Ok(left * right),
            Operation::Division => Self::divide(left, right),
        }
    }
}
