//! The diagnosis submission workflow.
//!
//! [`DiagnosisForm`] owns one page's form state and its busy flag. A submission validates the
//! draft, marks the form busy, sends one request, hands the report to a [`ReportSink`], and
//! clears the busy flag again however it ended.

use crate::client::PredictionClient;
use crate::constants::{DIAGNOSE_LABEL, DIAGNOSING_LABEL};
use crate::diagnosis::DiagnosisDraft;
use crate::download::ReportSink;
use crate::error::{EcgError, EcgResult};
use std::sync::atomic::{AtomicBool, Ordering};

/// Form state plus the in-flight guard for a single diagnosis form.
#[derive(Debug, Default)]
pub struct DiagnosisForm {
    draft: DiagnosisDraft,
    busy: AtomicBool,
}

/// Clears the busy flag when dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl DiagnosisForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft(draft: DiagnosisDraft) -> Self {
        Self {
            draft,
            busy: AtomicBool::new(false),
        }
    }

    pub fn draft(&self) -> &DiagnosisDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut DiagnosisDraft {
        &mut self.draft
    }

    /// True from the moment a request starts until it settles.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Label for the submit control in the current state.
    pub fn button_label(&self) -> &'static str {
        if self.is_busy() {
            DIAGNOSING_LABEL
        } else {
            DIAGNOSE_LABEL
        }
    }

    fn try_begin(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(&self.busy))
    }

    /// Submit the current draft.
    ///
    /// Validation happens before anything else, so an incomplete form never reaches the
    /// network. While a submission is in flight any further call returns `EcgError::Busy`
    /// without sending a request. The draft is left as it was, so the same submission can be
    /// repeated once this one settles.
    ///
    /// # Errors
    ///
    /// - `EcgError::MissingFields` if any field is empty,
    /// - `EcgError::Busy` if a submission from this form is still in flight,
    /// - any error from [`PredictionClient::predict`] or the sink.
    pub async fn submit<S: ReportSink>(
        &self,
        client: &PredictionClient,
        sink: &S,
    ) -> EcgResult<S::Output> {
        let request = self.draft.validate()?;

        let Some(_guard) = self.try_begin() else {
            tracing::debug!("ignoring diagnosis submission while another is in flight");
            return Err(EcgError::Busy);
        };

        let result = match client.predict(&request).await {
            Ok(report) => sink.deliver(report),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            tracing::error!("Diagnosis failed: {e}");
        }
        result
    }
}
