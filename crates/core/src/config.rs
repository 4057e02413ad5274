//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. Request
//! handling never reads process-wide environment variables, which keeps behaviour consistent in
//! multi-threaded runtimes and test harnesses.

use crate::constants::{DEFAULT_PREDICT_URL, DEFAULT_REPORT_DIR};
use crate::{EcgError, EcgResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    predict_url: Url,
    request_timeout: Option<Duration>,
    report_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `EcgError::InvalidConfig` if `predict_url` is not an http(s) URL.
    pub fn new(
        predict_url: Url,
        request_timeout: Option<Duration>,
        report_dir: PathBuf,
    ) -> EcgResult<Self> {
        if !matches!(predict_url.scheme(), "http" | "https") {
            return Err(EcgError::InvalidConfig(format!(
                "prediction endpoint must use http or https, got {}",
                predict_url.scheme()
            )));
        }

        Ok(Self {
            predict_url,
            request_timeout,
            report_dir,
        })
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }

    /// Whole-request timeout. `None` means requests may wait indefinitely.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            predict_url: default_predict_url(),
            request_timeout: None,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
        }
    }
}

fn default_predict_url() -> Url {
    Url::parse(DEFAULT_PREDICT_URL).expect("default prediction endpoint is a valid URL")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the prediction endpoint from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_PREDICT_URL`].
pub fn predict_url_from_env_value(value: Option<String>) -> EcgResult<Url> {
    match non_blank(value) {
        Some(raw) => Url::parse(&raw)
            .map_err(|e| EcgError::InvalidConfig(format!("invalid prediction endpoint {raw}: {e}"))),
        None => Ok(default_predict_url()),
    }
}

/// Parse the request timeout (whole seconds) from an optional string value.
///
/// Unset, empty, and `0` all mean "no timeout".
pub fn request_timeout_from_env_value(value: Option<String>) -> EcgResult<Option<Duration>> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };
    let secs: u64 = raw
        .parse()
        .map_err(|_| EcgError::InvalidConfig(format!("invalid request timeout: {raw}")))?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

/// Parse the report directory from an optional string value.
pub fn report_dir_from_env_value(value: Option<String>) -> PathBuf {
    non_blank(value)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_DIR))
}
