//! Request handlers for the calculator endpoints.
//!
//! Extraction failures are taken as `Result`s so they surface through
//! [`ApiError`](crate::error::ApiError) instead of axum's default rejection bodies.

use axum::{
    Json,
    extract::{
        OriginalUri, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use reckon_calculator::{CalculationResult, Operation};
use tracing::{debug, info};

use crate::AppState;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::types::{
    CalculationPatchRequest, CalculationRequest, CalculationResponse, HealthResponse, OperandsQuery,
};

pub const CALCULATOR_MESSAGE_HEADER: &str = "x-calculator-message";

fn respond(result: CalculationResult) -> ApiResult<Json<f64>> {
    Ok(Json(result?))
}

fn evaluate_operands(
    state: &AppState,
    query: Result<Query<OperandsQuery>, QueryRejection>,
    operation: Operation,
) -> ApiResult<Json<f64>> {
    let Query(operands) = query?;
    debug!(left = operands.left, right = operands.right, %operation, "Evaluating operands");
    respond(state.calculator.evaluate(operands.left, operands.right, operation))
}

fn calculate(
    state: &AppState,
    request: CalculationRequest,
    message: &str,
) -> ApiResult<CalculationResponse> {
    debug!(
        left = request.left,
        right = request.right,
        operation = %request.operation,
        "Performing calculation"
    );
    let result = state.calculator.evaluate(request.left, request.right, request.operation)?;
    Ok(CalculationResponse::new(request.operation, result, message))
}

/// Adds the two operands.
#[utoipa::path(
    get,
    path = "/add",
    tag = "calculator",
    params(OperandsQuery),
    responses(
        (status = 200, description = "Sum of both operands", body = f64),
        (status = 400, description = "Operands could not be parsed", body = ApiErrorResponse)
    )
)]
pub async fn add(
    State(state): State<AppState>,
    query: Result<Query<OperandsQuery>, QueryRejection>,
) -> ApiResult<Json<f64>> {
    evaluate_operands(&state, query, Operation::Addition)
}

/// Subtracts the right operand from the left.
#[utoipa::path(
    get,
    path = "/subtract",
    tag = "calculator",
    params(OperandsQuery),
    responses(
        (status = 200, description = "Difference of both operands", body = f64),
        (status = 400, description = "Operands could not be parsed", body = ApiErrorResponse)
    )
)]
pub async fn subtract(
    State(state): State<AppState>,
    query: Result<Query<OperandsQuery>, QueryRejection>,
) -> ApiResult<Json<f64>> {
    evaluate_operands(&state, query, Operation::Subtraction)
}

/// Multiplies the two operands.
#[utoipa::path(
    get,
    path = "/multiply",
    tag = "calculator",
    params(OperandsQuery),
    responses(
        (status = 200, description = "Product of both operands", body = f64),
        (status = 400, description = "Operands could not be parsed", body = ApiErrorResponse)
    )
)]
pub async fn multiply(
    State(state): State<AppState>,
    query: Result<Query<OperandsQuery>, QueryRejection>,
) -> ApiResult<Json<f64>> {
    evaluate_operands(&state, query, Operation::Multiplication)
}

/// Divides the left operand by the right.
#[utoipa::path(
    get,
    path = "/divide",
    tag = "calculator",
    params(OperandsQuery),
    responses(
        (status = 200, description = "Quotient of both operands", body = f64),
        (status = 400, description = "Division by zero", body = String, content_type = "text/plain")
    )
)]
pub async fn divide(
    State(state): State<AppState>,
    query: Result<Query<OperandsQuery>, QueryRejection>,
) -> ApiResult<Json<f64>> {
    evaluate_operands(&state, query, Operation::Division)
}

/// Product plus sum of the two operands.
#[utoipa::path(
    get,
    path = "/multipleAdd",
    tag = "calculator",
    params(OperandsQuery),
    responses(
        (status = 200, description = "left * right + (left + right)", body = f64),
        (status = 400, description = "Operands could not be parsed", body = ApiErrorResponse)
    )
)]
pub async fn multiple_add(
    State(state): State<AppState>,
    query: Result<Query<OperandsQuery>, QueryRejection>,
) -> ApiResult<Json<f64>> {
    let Query(operands) = query?;
    debug!(left = operands.left, right = operands.right, "Evaluating multiply-then-add");
    respond(state.calculator.multiply_then_add(operands.left, operands.right))
}

/// Sum plus difference of the two operands.
#[utoipa::path(
    get,
    path = "/addSubtractAdd",
    tag = "calculator",
    params(OperandsQuery),
    responses(
        (status = 200, description = "(left + right) + (left - right)", body = f64),
        (status = 400, description = "Operands could not be parsed", body = ApiErrorResponse)
    )
)]
pub async fn add_subtract_add(
    State(state): State<AppState>,
    query: Result<Query<OperandsQuery>, QueryRejection>,
) -> ApiResult<Json<f64>> {
    let Query(operands) = query?;
    debug!(left = operands.left, right = operands.right, "Evaluating add-subtract-add");
    respond(state.calculator.add_subtract_add(operands.left, operands.right))
}

/// Creates a calculation and returns its result.
#[utoipa::path(
    post,
    path = "/operations",
    tag = "operations",
    request_body = CalculationRequest,
    responses(
        (status = 201, description = "Calculation created", body = CalculationResponse,
            headers(("Location" = String, description = "Path of the operations resource"))),
        (status = 400, description = "Division by zero", body = String, content_type = "text/plain")
    )
)]
pub async fn create_calculation(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    let response = calculate(&state, request, "Calculation created successfully.")?;
    Ok((StatusCode::CREATED, [(header::LOCATION, uri.path().to_string())], Json(response)))
}

/// Replaces a calculation and returns the recomputed result.
///
/// Nothing is stored, so this computes exactly what create does.
#[utoipa::path(
    put,
    path = "/operations",
    tag = "operations",
    request_body = CalculationRequest,
    responses(
        (status = 200, description = "Calculation replaced", body = CalculationResponse),
        (status = 400, description = "Division by zero", body = String, content_type = "text/plain")
    )
)]
pub async fn replace_calculation(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> ApiResult<Json<CalculationResponse>> {
    let Json(request) = payload?;
    Ok(Json(calculate(&state, request, "Calculation replaced successfully.")?))
}

/// Partially updates a calculation; omitted fields fall back to `0` and
/// `Addition`.
#[utoipa::path(
    patch,
    path = "/operations",
    tag = "operations",
    request_body = CalculationPatchRequest,
    responses(
        (status = 200, description = "Calculation updated", body = CalculationResponse),
        (status = 400, description = "Division by zero", body = String, content_type = "text/plain")
    )
)]
pub async fn update_calculation(
    State(state): State<AppState>,
    payload: Result<Json<CalculationPatchRequest>, JsonRejection>,
) -> ApiResult<Json<CalculationResponse>> {
    let Json(patch) = payload?;
    Ok(Json(calculate(&state, patch.resolve(), "Calculation updated successfully.")?))
}

/// Acknowledges deletion of a calculation for the given operation.
#[utoipa::path(
    delete,
    path = "/operations/{operation}",
    tag = "operations",
    params(("operation" = Operation, Path, description = "Operation name or ordinal")),
    responses(
        (status = 204, description = "Calculation deleted",
            headers(("X-Calculator-Message" = String, description = "Confirmation message"))),
        (status = 400, description = "Unknown operation", body = ApiErrorResponse)
    )
)]
pub async fn delete_calculation(
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(raw) = path?;
    let operation: Operation = raw.parse()?;
    info!(%operation, "Calculation deleted");
    let message = format!("Calculation for {operation} deleted successfully.");
    Ok((StatusCode::NO_CONTENT, [(CALCULATOR_MESSAGE_HEADER, message)]))
}

/// Reports service liveness.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.elapsed().as_secs(),
    })
}
