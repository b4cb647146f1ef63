//! Reckon calculator HTTP API
//!
//! An axum router exposing the arithmetic in `reckon-calculator` through
//! read-style `GET` endpoints and a CRUD-style `operations` resource, with a
//! generated OpenAPI document served through Redoc.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | /add, /subtract, /multiply, /divide | [`handlers::add`] and friends |
//! | GET | /multipleAdd | [`handlers::multiple_add`] |
//! | GET | /addSubtractAdd | [`handlers::add_subtract_add`] |
//! | POST, PUT, PATCH | /operations | create, replace, update |
//! | DELETE | /operations/{operation} | [`handlers::delete_calculation`] |
//! | GET | /health | [`handlers::health`] |
//! | GET | /api-docs/openapi.json, /redoc | OpenAPI document and viewer |

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use reckon_calculator::{Calculator, StandardCalculator};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

pub mod config;
pub mod error;
pub mod handlers;
pub mod tracing_setup;
pub mod types;

use config::ReckonConfig;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";
pub const REDOC_PATH: &str = "/redoc";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reckon Calculator API",
        description = "Basic arithmetic exposed over REST-style endpoints."
    ),
    paths(
        handlers::add,
        handlers::subtract,
        handlers::multiply,
        handlers::divide,
        handlers::multiple_add,
        handlers::add_subtract_add,
        handlers::create_calculation,
        handlers::replace_calculation,
        handlers::update_calculation,
        handlers::delete_calculation,
        handlers::health,
    ),
    components(schemas(
        reckon_calculator::Operation,
        types::CalculationRequest,
        types::CalculationPatchRequest,
        types::CalculationResponse,
        types::HealthResponse,
        error::ApiErrorResponse,
    )),
    tags(
        (name = "calculator", description = "Two-operand arithmetic"),
        (name = "operations", description = "Calculations as a resource"),
        (name = "health", description = "Service status"),
    )
)]
pub struct ApiDoc;

/// Shared, immutable application state
#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<dyn Calculator>,
    pub config: Arc<ReckonConfig>,
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ReckonConfig) -> Self {
        Self::with_calculator(config, Arc::new(StandardCalculator::new()))
    }

    pub fn with_calculator(config: ReckonConfig, calculator: Arc<dyn Calculator>) -> Self {
        Self { calculator, config: Arc::new(config), start_time: Utc::now() }
    }

    pub fn elapsed(&self) -> Duration {
        (Utc::now() - self.start_time).to_std().unwrap_or_default()
    }
}

/// Build the router with default configuration.
pub fn create_app() -> Router {
    create_router(AppState::new(ReckonConfig::default()))
}

/// Build the router from a loaded configuration.
pub fn create_app_with_config(config: ReckonConfig) -> Router {
    create_router(AppState::new(config))
}

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.limits.max_body_size_bytes();
    info!(body_limit, "Building calculator router");

    Router::new()
        .route("/add", get(handlers::add))
        .route("/subtract", get(handlers::subtract))
        .route("/multiply", get(handlers::multiply))
        .route("/divide", get(handlers::divide))
        .route("/multipleAdd", get(handlers::multiple_add))
        .route("/addSubtractAdd", get(handlers::add_subtract_add))
        .route(
            "/operations",
            post(handlers::create_calculation)
                .put(handlers::replace_calculation)
                .patch(handlers::update_calculation),
        )
        .route("/operations/{operation}", delete(handlers::delete_calculation))
        .route("/health", get(handlers::health))
        .route(OPENAPI_PATH, get(openapi_document))
        .with_state(state)
        .merge(Redoc::with_url(REDOC_PATH, ApiDoc::openapi()))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(tracing_setup::http_trace_layer())
}

async fn openapi_document() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
