//! HTTP client for the prediction service.
//!
//! One diagnosis is one `POST` to the configured endpoint with a multipart body. The response
//! body is read as raw bytes and wrapped as a PDF report. There is no retry.

use crate::config::CoreConfig;
use crate::diagnosis::DiagnosisRequest;
use crate::error::{EcgError, EcgResult};
use crate::report::DiagnosisReport;
use url::Url;

/// HTTP client for a single prediction endpoint.
#[derive(Clone, Debug)]
pub struct PredictionClient {
    client: reqwest::Client,
    predict_url: Url,
}

impl PredictionClient {
    /// Create a client for the endpoint in `cfg`.
    ///
    /// A request timeout is applied only when one is configured.
    ///
    /// # Errors
    ///
    /// Returns `EcgError::RequestBuild` if the underlying HTTP client cannot be constructed.
    pub fn new(cfg: &CoreConfig) -> EcgResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = cfg.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(EcgError::RequestBuild)?;

        Ok(Self::with_client(client, cfg.predict_url().clone()))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, predict_url: Url) -> Self {
        Self {
            client,
            predict_url,
        }
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }

    /// Send a diagnosis request and return the generated report.
    ///
    /// # Errors
    ///
    /// - `EcgError::RequestBuild` if the multipart body cannot be built,
    /// - `EcgError::Transport` if the request fails (connection, DNS, timeout),
    /// - `EcgError::Service` if the service answers with a non-2xx status,
    /// - `EcgError::Decode` if the response body cannot be read.
    pub async fn predict(&self, request: &DiagnosisRequest) -> EcgResult<DiagnosisReport> {
        let form = request.to_multipart()?;

        tracing::debug!(
            endpoint = %self.predict_url,
            image = request.image().file_name(),
            "sending diagnosis request"
        );

        let response = self
            .client
            .post(self.predict_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(EcgError::Transport)?;

        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await.map_err(EcgError::Decode)?;

        tracing::info!(size = bytes.len(), "received diagnosis report");

        Ok(DiagnosisReport::new(request.report_filename(), bytes))
    }

    /// Turn a non-2xx response into `EcgError::Service`, keeping the body for diagnostics.
    async fn ensure_success(response: reqwest::Response) -> EcgResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(EcgError::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
