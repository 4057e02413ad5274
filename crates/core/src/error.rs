use crate::constants::{
    CONSENT_REQUIRED_MESSAGE, DIAGNOSIS_FAILED_MESSAGE, INVALID_EMAIL_MESSAGE,
    MISSING_CONTACT_FIELDS_MESSAGE, MISSING_DIAGNOSIS_FIELDS_MESSAGE,
};

/// Which form a missing-field error came from.
///
/// The two forms surface different blocking messages for the same kind of failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormKind {
    Diagnosis,
    Contact,
}

#[derive(Debug, thiserror::Error)]
pub enum EcgError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingFields {
        form: FormKind,
        fields: Vec<&'static str>,
    },
    #[error("invalid gender: {0}")]
    InvalidGender(String),
    #[error("a diagnosis request is already in flight")]
    Busy,
    #[error("failed to read image {path}: {source}", path = .path.display())]
    ImageRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build prediction request: {0}")]
    RequestBuild(#[source] reqwest::Error),
    #[error("prediction request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("prediction service returned {status}: {body}")]
    Service { status: u16, body: String },
    #[error("failed to read prediction response body: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("failed to save report: {0}")]
    ReportWrite(#[source] std::io::Error),
    #[error("failed to deliver report: {0}")]
    Delivery(String),
    #[error("consent is required")]
    ConsentRequired,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

impl EcgError {
    /// The single blocking message a user sees for this error.
    ///
    /// Every transport, service, decoding, and delivery failure maps to the same generic
    /// message. `Busy` has none: the submit control is disabled while a request is in flight.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            EcgError::Busy => None,
            EcgError::MissingFields {
                form: FormKind::Diagnosis,
                ..
            }
            | EcgError::InvalidGender(_) => Some(MISSING_DIAGNOSIS_FIELDS_MESSAGE),
            EcgError::MissingFields {
                form: FormKind::Contact,
                ..
            } => Some(MISSING_CONTACT_FIELDS_MESSAGE),
            EcgError::ConsentRequired => Some(CONSENT_REQUIRED_MESSAGE),
            EcgError::InvalidEmail(_) => Some(INVALID_EMAIL_MESSAGE),
            EcgError::InvalidConfig(_)
            | EcgError::ImageRead { .. }
            | EcgError::RequestBuild(_)
            | EcgError::Transport(_)
            | EcgError::Service { .. }
            | EcgError::Decode(_)
            | EcgError::ReportWrite(_)
            | EcgError::Delivery(_) => Some(DIAGNOSIS_FAILED_MESSAGE),
        }
    }

    /// True for errors the user can fix by correcting form input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EcgError::MissingFields { .. }
                | EcgError::InvalidGender(_)
                | EcgError::ConsentRequired
                | EcgError::InvalidEmail(_)
        )
    }
}

pub type EcgResult<T> = std::result::Result<T, EcgError>;
