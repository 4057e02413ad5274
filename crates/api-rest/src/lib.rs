//! # API REST
//!
//! Web front-end for the ECG diagnosis service.
//!
//! Handles:
//! - The routed HTML pages (Home, About, Services, How It Works, Contact)
//! - The diagnosis form post, answered with the PDF report as an attachment
//! - The local-only contact form
//! - `/health` and the OpenAPI/Swagger documentation
//!
//! All workflow logic lives in `ecg-core`; this crate only adapts it to HTTP.

#![warn(rust_2018_idioms)]

pub mod handlers;
pub mod pages;

use api_shared::HealthService;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use ecg_core::{CoreConfig, EcgResult, PredictionClient};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Largest accepted diagnosis upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Header carrying the blocking message on a rejected submission.
pub const MESSAGE_HEADER: &str = "x-ecg-message";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: PredictionClient,
    pub health: HealthService,
}

impl AppState {
    /// Build handler state from the startup configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the prediction HTTP client cannot be constructed.
    pub fn new(cfg: &CoreConfig) -> EcgResult<Self> {
        let client = PredictionClient::new(cfg)?;
        let health = HealthService::new(cfg.predict_url().as_str());
        Ok(Self { client, health })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handlers::health, handlers::diagnose, handlers::submit_contact),
    components(schemas(
        api_shared::HealthRes,
        api_shared::ContactRes,
        api_shared::ErrorRes,
        handlers::DiagnosisUpload
    ))
)]
pub struct ApiDoc;

/// Build the full router: pages, form posts, health and API docs.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/about", get(handlers::about))
        .route(
            "/services",
            get(handlers::services).post(handlers::diagnose),
        )
        .route("/how-it-works", get(handlers::how_it_works))
        .route(
            "/contact",
            get(handlers::contact).post(handlers::submit_contact),
        )
        .route("/health", get(handlers::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
