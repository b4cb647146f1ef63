//! OpenAPI-compliant types for the Reckon calculator API
//!
//! This module defines the JSON and query shapes exchanged over HTTP and
//! provides automatic documentation generation through utoipa.

use reckon_calculator::Operation;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Operands for the read-style endpoints. Missing values bind to `0`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OperandsQuery {
    /// Left operand
    #[serde(default)]
    #[param(example = 6.0)]
    pub left: f64,

    /// Right operand
    #[serde(default)]
    #[param(example = 3.0)]
    pub right: f64,
}

/// A complete calculation to perform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    /// Left operand
    #[schema(example = 6.0)]
    pub left: f64,

    /// Right operand
    #[schema(example = 3.0)]
    pub right: f64,

    /// Operation to apply, by name or ordinal
    pub operation: Operation,
}

/// A calculation where every field may be omitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculationPatchRequest {
    /// Left operand, `0` when absent
    #[serde(default)]
    #[schema(example = 6.0)]
    pub left: Option<f64>,

    /// Right operand, `0` when absent
    #[serde(default)]
    #[schema(example = 3.0)]
    pub right: Option<f64>,

    /// Operation to apply, `Addition` when absent
    #[serde(default)]
    pub operation: Option<Operation>,
}

impl CalculationPatchRequest {
    /// Fill in the missing fields.
    pub fn resolve(self) -> CalculationRequest {
        CalculationRequest {
            left: self.left.unwrap_or(0.0),
            right: self.right.unwrap_or(0.0),
            operation: self.operation.unwrap_or(Operation::Addition),
        }
    }
}

/// Outcome of a calculation on the `operations` resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    /// Name of the operation that was applied
    #[schema(example = "Division")]
    pub operation: String,

    /// Numeric result
    #[schema(example = 2.0)]
    pub result: f64,

    /// Human-readable status
    #[schema(example = "Calculation created successfully.")]
    pub message: String,
}

impl CalculationResponse {
    pub fn new(operation: Operation, result: f64, message: impl Into<String>) -> Self {
        Self { operation: operation.to_string(), result, message: message.into() }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    #[schema(example = "healthy")]
    pub status: String,

    /// Service version
    #[schema(example = "0.1.0")]
    pub version: String,

    /// Seconds since the server started
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_patch_resolves_to_zero_addition() {
        let patch: CalculationPatchRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(
            patch.resolve(),
            CalculationRequest { left: 0.0, right: 0.0, operation: Operation::Addition }
        );
    }

    #[test]
    fn patch_keeps_supplied_fields() {
        let patch: CalculationPatchRequest =
            serde_json::from_value(json!({ "right": 4.0, "operation": "Multiplication" })).unwrap();
        assert_eq!(
            patch.resolve(),
            CalculationRequest { left: 0.0, right: 4.0, operation: Operation::Multiplication }
        );
    }

    #[test]
    fn request_accepts_operation_ordinals() {
        let request: CalculationRequest =
            serde_json::from_value(json!({ "left": 1.0, "right": 2.0, "operation": 3 })).unwrap();
        assert_eq!(request.operation, Operation::Division);
    }

    #[test]
    fn response_serializes_camel_case() {
        let response = CalculationResponse::new(Operation::Subtraction, 1.5, "done");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "operation": "Subtraction", "result": 1.5, "message": "done" })
        );
    }
}
