//! # API REST
//!
//! REST API implementation for the EHR records service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialisation, CORS, status codes)
//!
//! The router is built around an injected [`PatientService`], so tests and the server binary
//! choose the store.

#![warn(rust_2018_idioms)]

pub mod error;
mod handlers;

use axum::{routing::get, Router};
use ehr_core::PatientService;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

impl AppState {
    pub fn new(patient_service: PatientService) -> Self {
        Self { patient_service }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_records,
        handlers::get_record,
        handlers::create_record,
        handlers::update_record,
        handlers::delete_record,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::VitalSigns,
        api_shared::PatientFieldsReq,
        api_shared::PatientRecordRes,
        api_shared::ErrorRes,
        api_shared::FieldErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router: record routes, Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/records",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route(
            "/records/:id",
            get(handlers::get_record)
                .put(handlers::update_record)
                .delete(handlers::delete_record),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
