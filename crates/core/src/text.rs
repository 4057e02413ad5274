//! Validated text types.

use std::str::FromStr;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is kept exactly as entered. Surrounding whitespace is preserved and a
/// whitespace-only value is not empty; only the empty string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(input.to_owned()))
    }

    /// Like [`NonEmptyText::new`], but maps empty input to `None`.
    pub fn from_field(input: impl AsRef<str>) -> Option<Self> {
        Self::new(input).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Replaces every run of whitespace with a single underscore.
///
/// `"Dr. P  Dhanalakshmi"` becomes `"Dr._P_Dhanalakshmi"`.
pub fn underscore_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_keeps_input_verbatim() {
        let text = NonEmptyText::new("  Asha Rao \n").unwrap();
        assert_eq!(text.as_str(), "  Asha Rao \n");
    }

    #[test]
    fn only_the_empty_string_is_empty() {
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
        assert!(NonEmptyText::from_field("").is_none());
        assert_eq!(NonEmptyText::new(" \t ").unwrap().as_str(), " \t ");
    }

    #[test]
    fn deserialize_rejects_empty() {
        let result: Result<NonEmptyText, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
        let spaces: NonEmptyText = serde_json::from_str("\"   \"").unwrap();
        assert_eq!(spaces.as_str(), "   ");
    }

    #[test]
    fn underscore_whitespace_collapses_runs() {
        assert_eq!(underscore_whitespace("Dr. P Dhanalakshmi"), "Dr._P_Dhanalakshmi");
        assert_eq!(underscore_whitespace("a \t\n b"), "a_b");
        assert_eq!(underscore_whitespace(" lead"), "_lead");
        assert_eq!(underscore_whitespace("none"), "none");
    }
}
