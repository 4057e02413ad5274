//! Constants used throughout the ECG core crate.
//!
//! Endpoint defaults, report naming, and the fixed user-facing messages live here so the
//! web and command-line front-ends show exactly the same text.

/// Prediction endpoint used when no explicit endpoint is configured.
pub const DEFAULT_PREDICT_URL: &str = "http://localhost:5001/predict";

/// Directory the CLI writes reports into when none is configured.
pub const DEFAULT_REPORT_DIR: &str = ".";

/// Prefix of every downloaded report filename.
pub const REPORT_FILENAME_PREFIX: &str = "ECG_Report_";

/// Extension of every downloaded report filename.
pub const REPORT_FILENAME_EXTENSION: &str = ".pdf";

/// Media type asserted for the prediction service's response body.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Fallback media type for an image whose content cannot be sniffed.
pub const FALLBACK_IMAGE_MIME_TYPE: &str = "application/octet-stream";

/// Multipart field names, in the order they are appended to the request.
pub const FIELD_NAME: &str = "name";
pub const FIELD_AGE: &str = "age";
pub const FIELD_GENDER: &str = "gender";
pub const FIELD_IMAGE: &str = "image";

/// Blocking message shown when a diagnosis field is missing.
pub const MISSING_DIAGNOSIS_FIELDS_MESSAGE: &str = "Please fill all fields and upload an image.";

/// Blocking message shown for any transport or service failure.
pub const DIAGNOSIS_FAILED_MESSAGE: &str = "Something went wrong. Please try again.";

/// Blocking message shown when the contact form is submitted without consent.
pub const CONSENT_REQUIRED_MESSAGE: &str = "Please provide consent to submit the form.";

/// Blocking message shown when a required contact field is missing.
pub const MISSING_CONTACT_FIELDS_MESSAGE: &str = "Please fill all required fields.";

/// Blocking message shown when the contact email is malformed.
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";

/// Acknowledgement shown after a contact submission.
pub const CONTACT_ACK_MESSAGE: &str = "Your message has been submitted!";

/// Submit control label while idle.
pub const DIAGNOSE_LABEL: &str = "Diagnose";

/// Submit control label while a request is in flight.
pub const DIAGNOSING_LABEL: &str = "Diagnosing...";
