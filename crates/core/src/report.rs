//! Generated diagnosis reports.

use crate::constants::{PDF_MIME_TYPE, REPORT_FILENAME_EXTENSION, REPORT_FILENAME_PREFIX};
use crate::text::underscore_whitespace;
use bytes::Bytes;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Download filename for a patient's report: `ECG_Report_<name>.pdf`, with every whitespace
/// run in the name replaced by `_`.
pub fn report_filename(name: &str) -> String {
    format!(
        "{}{}{}",
        REPORT_FILENAME_PREFIX,
        underscore_whitespace(name),
        REPORT_FILENAME_EXTENSION
    )
}

/// Binary report returned by the prediction service.
///
/// The body is treated as an opaque PDF document and never parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosisReport {
    filename: String,
    bytes: Bytes,
}

impl DiagnosisReport {
    pub fn new(filename: String, bytes: Bytes) -> Self {
        if !bytes.starts_with(PDF_MAGIC) {
            tracing::warn!(
                filename = %filename,
                size = bytes.len(),
                "prediction response does not look like a PDF document"
            );
        }
        Self { filename, bytes }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &'static str {
        PDF_MIME_TYPE
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}
