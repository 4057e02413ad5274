//! # API Shared
//!
//! Shared response types and services for the ECG front-end's HTTP surfaces.
//!
//! Contains:
//! - Serialisable response bodies (`HealthRes`, `ContactRes`, `ErrorRes`)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and documented in its OpenAPI schema.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
