//! Diagnosis request types.
//!
//! A [`DiagnosisDraft`] holds the form fields as the user fills them in. Validating a draft
//! yields an immutable [`DiagnosisRequest`], which is the only thing the prediction client
//! will send.

use crate::constants::{
    FALLBACK_IMAGE_MIME_TYPE, FIELD_AGE, FIELD_GENDER, FIELD_IMAGE, FIELD_NAME,
};
use crate::error::{EcgError, EcgResult, FormKind};
use crate::report::report_filename;
use crate::text::NonEmptyText;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::str::FromStr;

/// Patient gender as accepted by the prediction service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    /// Wire value sent in the `gender` part.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// Human-readable option label.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    /// Parse a select value where the empty string means "not chosen".
    ///
    /// # Errors
    ///
    /// Returns `EcgError::InvalidGender` for any non-empty value other than the three options.
    pub fn from_field(value: &str) -> EcgResult<Option<Self>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        value.parse().map(Some)
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = EcgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EcgError::InvalidGender(s.to_string()))
    }
}

/// Snapshot of a chosen image file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    content_type: String,
    bytes: Bytes,
}

impl ImageUpload {
    /// Wrap an uploaded file.
    ///
    /// Returns `None` when there is no file name and no content, which is how a browser
    /// submits a file input with nothing chosen. An empty `content_type` is replaced by the
    /// sniffed type.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Option<Self> {
        let file_name = file_name.into();
        let bytes = bytes.into();
        if file_name.is_empty() && bytes.is_empty() {
            return None;
        }

        let mut content_type = content_type.into();
        if content_type.trim().is_empty() {
            content_type = sniff_content_type(&bytes).to_string();
        }

        Some(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Read an image from disk, sniffing its media type from the content.
    ///
    /// # Errors
    ///
    /// Returns `EcgError::ImageRead` if the file cannot be read.
    pub fn from_path(path: &Path) -> EcgResult<Self> {
        let bytes = std::fs::read(path).map_err(|source| EcgError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let content_type = sniff_content_type(&bytes).to_string();

        Ok(Self {
            file_name,
            content_type,
            bytes: Bytes::from(bytes),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    fn to_part(&self) -> EcgResult<Part> {
        Part::stream_with_length(self.bytes.clone(), self.bytes.len() as u64)
            .file_name(self.file_name.clone())
            .mime_str(&self.content_type)
            .map_err(EcgError::RequestBuild)
    }
}

// Best effort; the prediction service decides what it accepts.
fn sniff_content_type(bytes: &[u8]) -> &'static str {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or(FALLBACK_IMAGE_MIME_TYPE)
}

/// Form state for one diagnosis page. Every field starts unset.
#[derive(Clone, Debug, Default)]
pub struct DiagnosisDraft {
    pub name: Option<NonEmptyText>,
    pub age: Option<NonEmptyText>,
    pub gender: Option<Gender>,
    pub image: Option<ImageUpload>,
}

impl DiagnosisDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, value: &str) {
        self.name = NonEmptyText::from_field(value);
    }

    pub fn set_age(&mut self, value: &str) {
        self.age = NonEmptyText::from_field(value);
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) {
        self.gender = gender;
    }

    pub fn set_image(&mut self, image: Option<ImageUpload>) {
        self.image = image;
    }

    /// Field names that are still empty, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push(FIELD_NAME);
        }
        if self.age.is_none() {
            missing.push(FIELD_AGE);
        }
        if self.gender.is_none() {
            missing.push(FIELD_GENDER);
        }
        if self.image.is_none() {
            missing.push(FIELD_IMAGE);
        }
        missing
    }

    /// Check that every field is present and build the request to send.
    ///
    /// Only presence is checked. Age is not range-checked and the image content is not
    /// inspected.
    ///
    /// # Errors
    ///
    /// Returns `EcgError::MissingFields` naming each empty field.
    pub fn validate(&self) -> EcgResult<DiagnosisRequest> {
        match (&self.name, &self.age, self.gender, &self.image) {
            (Some(name), Some(age), Some(gender), Some(image)) => Ok(DiagnosisRequest {
                name: name.clone(),
                age: age.clone(),
                gender,
                image: image.clone(),
            }),
            _ => Err(EcgError::MissingFields {
                form: FormKind::Diagnosis,
                fields: self.missing_fields(),
            }),
        }
    }
}

/// A complete diagnosis request, ready to be sent.
#[derive(Clone, Debug)]
pub struct DiagnosisRequest {
    name: NonEmptyText,
    age: NonEmptyText,
    gender: Gender,
    image: ImageUpload,
}

impl DiagnosisRequest {
    pub fn name(&self) -> &NonEmptyText {
        &self.name
    }

    pub fn age(&self) -> &NonEmptyText {
        &self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn image(&self) -> &ImageUpload {
        &self.image
    }

    /// Filename the generated report is downloaded under.
    pub fn report_filename(&self) -> String {
        report_filename(self.name.as_str())
    }

    /// Multipart body with exactly the `name`, `age`, `gender` and `image` parts.
    ///
    /// # Errors
    ///
    /// Returns `EcgError::RequestBuild` if the image content type is not a valid media type.
    pub fn to_multipart(&self) -> EcgResult<Form> {
        Ok(Form::new()
            .text(FIELD_NAME, self.name.as_str().to_owned())
            .text(FIELD_AGE, self.age.as_str().to_owned())
            .text(FIELD_GENDER, self.gender.as_str())
            .part(FIELD_IMAGE, self.image.to_part()?))
    }
}
