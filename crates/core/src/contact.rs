//! Contact form.
//!
//! Submissions are checked and acknowledged locally. Nothing is sent anywhere.

use crate::constants::CONTACT_ACK_MESSAGE;
use crate::error::{EcgError, EcgResult, FormKind};
use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidateEmail;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    /// HTML checkboxes submit `on` when checked and nothing otherwise.
    #[serde(default, deserialize_with = "checkbox")]
    pub consent: bool,
}

/// Local acknowledgement of a contact submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContactAck {
    pub message: &'static str,
}

impl ContactForm {
    /// Required fields that are empty or whitespace-only, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Check and acknowledge the submission.
    ///
    /// Consent is checked before anything else.
    ///
    /// # Errors
    ///
    /// - `EcgError::ConsentRequired` if the consent box is unchecked,
    /// - `EcgError::MissingFields` if name, email or phone is empty,
    /// - `EcgError::InvalidEmail` if the email address is malformed.
    pub fn submit(&self) -> EcgResult<ContactAck> {
        if !self.consent {
            return Err(EcgError::ConsentRequired);
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(EcgError::MissingFields {
                form: FormKind::Contact,
                fields: missing,
            });
        }

        let email = self.email.trim().to_string();
        if !email.validate_email() {
            return Err(EcgError::InvalidEmail(email));
        }

        tracing::info!(
            name = %self.name.trim(),
            email = %email,
            phone = %self.phone.trim(),
            message_len = self.message.len(),
            "contact form submitted"
        );

        Ok(ContactAck {
            message: CONTACT_ACK_MESSAGE,
        })
    }
}

fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Checkbox {
        Bool(bool),
        Text(String),
    }

    Ok(match Checkbox::deserialize(deserializer)? {
        Checkbox::Bool(checked) => checked,
        Checkbox::Text(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "on" | "true" | "1" | "yes"
        ),
    })
}
