//! # ECG Core
//!
//! Core logic for the ECG diagnosis front-end.
//!
//! This crate contains the diagnosis submission workflow and the local-only pieces around it:
//! - Form state, validation, and multipart request construction for diagnosis requests
//! - The HTTP client for the remote prediction endpoint
//! - Report naming and delivery (saving to disk with scoped temporary files)
//! - The contact form and the navigation model
//!
//! **No server concerns**: HTML rendering, routing, and HTTP handlers belong in `api-rest`.

pub mod client;
pub mod config;
pub mod constants;
pub mod contact;
pub mod diagnosis;
pub mod download;
pub mod error;
pub mod form;
pub mod navigation;
pub mod report;
pub mod text;

pub use client::PredictionClient;
pub use config::CoreConfig;
pub use contact::{ContactAck, ContactForm};
pub use diagnosis::{DiagnosisDraft, DiagnosisRequest, Gender, ImageUpload};
pub use download::{DirectorySink, ReportSink};
pub use error::{EcgError, EcgResult, FormKind};
pub use form::DiagnosisForm;
pub use navigation::{CallToAction, Route};
pub use report::{report_filename, DiagnosisReport};
pub use text::NonEmptyText;
