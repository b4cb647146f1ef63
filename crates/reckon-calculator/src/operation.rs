//! The closed set of arithmetic operations.
//!
//! Operations travel over the wire by name (`"Addition"`) and are parsed
//! case-insensitively. Ordinals `0..=3` are accepted as well, in declaration
//! order, so clients that send the numeric form keep working.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::CalculatorError;

/// One of the four arithmetic operations the dispatcher understands.
///
/// Accepted as a case-insensitive name or as the ordinal 0 (Addition),
/// 1 (Subtraction), 2 (Multiplication) or 3 (Division). Always returned by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub enum Operation {
    /// `left + right`
    #[default]
    Addition,
    /// `left - right`
    Subtraction,
    /// `left * right`
    Multiplication,
    /// `left / right`, rejected when `right` is zero
    Division,
}

impl Operation {
    /// Every operation, in ordinal order.
    pub const ALL: [Operation; 4] = [
        Operation::Addition,
        Operation::Subtraction,
        Operation::Multiplication,
        Operation::Division,
    ];

    /// Canonical name, as used in responses and headers.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Addition => "Addition",
            Operation::Subtraction => "Subtraction",
            Operation::Multiplication => "Multiplication",
            Operation::Division => "Division",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i64> for Operation {
    type Error = CalculatorError;

    fn try_from(ordinal: i64) -> Result<Self, Self::Error> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or_else(|| CalculatorError::invalid_operation(ordinal.to_string()))
    }
}

impl FromStr for Operation {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(ordinal) = trimmed.parse::<i64>() {
            return Self::try_from(ordinal);
        }
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CalculatorError::invalid_operation(s))
    }
}

struct OperationVisitor;

impl Visitor<'_> for OperationVisitor {
    type Value = Operation;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an operation name or an ordinal between 0 and 3")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Operation, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Operation, E> {
        Operation::try_from(value).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Operation, E> {
        i64::try_from(value)
            .map_err(|_| CalculatorError::invalid_operation(value.to_string()))
            .and_then(Operation::try_from)
            .map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(OperationVisitor)
    }
}
