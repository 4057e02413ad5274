use crate::types::HealthRes;

/// Health service shared by every HTTP surface.
///
/// Reports liveness of this front-end only. The prediction service is not contacted, since a
/// probe would itself be a diagnosis request.
#[derive(Clone, Debug)]
pub struct HealthService {
    predict_url: String,
}

impl HealthService {
    /// Creates a health service that reports the given prediction endpoint.
    pub fn new(predict_url: impl Into<String>) -> Self {
        Self {
            predict_url: predict_url.into(),
        }
    }

    /// Returns a `HealthRes` indicating the front-end is alive.
    pub fn check_health(&self) -> HealthRes {
        HealthRes {
            ok: true,
            message: "ECG front-end is alive".into(),
            predict_url: self.predict_url.clone(),
        }
    }
}
