//! Per-session state: the draft and the single-writer rule around it.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::draft::{DraftExport, DraftStore};
use crate::error::SynthesisError;
use crate::params::{DocumentType, SynthesisParameters};
use crate::pipeline::{Pipeline, Synthesis};

#[derive(Default)]
struct SessionState {
    draft: DraftStore,
    document_type: Option<DocumentType>,
    /// Set once the backend rejects the credential.
    fatal: Option<SynthesisError>,
}

/// One user's interactive session.
///
/// At most one synthesis runs at a time; a second request while one is in
/// flight fails with [`SynthesisError::Busy`] instead of racing it. Once the
/// backend rejects the credential, every later synthesis fails with the same
/// [`SynthesisError::AuthenticationMissing`] without contacting the backend.
#[derive(Default)]
pub struct Session {
    state: Mutex<SessionState>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the synthesis ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run the pipeline and, on success only, replace the draft.
    pub async fn synthesize(
        &self,
        pipeline: &Pipeline,
        params: &SynthesisParameters,
    ) -> Result<Synthesis, SynthesisError> {
        let _guard = InFlight::acquire(&self.in_flight).ok_or(SynthesisError::Busy)?;
        if let Some(err) = self.state.lock().await.fatal.clone() {
            return Err(err);
        }
        let synthesis = match pipeline.run(params).await {
            Ok(synthesis) => synthesis,
            Err(err) => {
                if err.is_fatal_for_session() {
                    warn!(error = %err, "credential rejected; session can no longer synthesize");
                    self.state.lock().await.fatal = Some(err.clone());
                }
                return Err(err);
            }
        };
        let mut state = self.state.lock().await;
        state.draft.replace(synthesis.text.clone());
        state.document_type = Some(params.document_type);
        debug!(chars = synthesis.text.len(), "draft replaced");
        Ok(synthesis)
    }

    pub async fn draft(&self) -> String {
        self.state.lock().await.draft.get().to_string()
    }

    pub async fn edit(&self, text: impl Into<String>) {
        self.state.lock().await.draft.edit(text);
    }

    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.draft.clear();
        state.document_type = None;
    }

    /// Document type of the last successful synthesis, if any.
    pub async fn document_type(&self) -> Option<DocumentType> {
        self.state.lock().await.document_type
    }

    /// Package the draft for download. Without an explicit type the last
    /// synthesized one is used, then [`DocumentType::DischargeSummary`].
    pub async fn export(&self, document_type: Option<DocumentType>) -> DraftExport {
        let state = self.state.lock().await;
        let document_type = document_type
            .or(state.document_type)
            .unwrap_or(DocumentType::DischargeSummary);
        state.draft.export(document_type)
    }
}
