//! Extraction orchestrator
//!
//! Owns the loaded image, the submitted query and the latest result, and
//! enforces one request in flight at a time. State lives behind a mutex
//! that is only held between awaits, never across one.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::extraction::{ExtractionRequest, ExtractionResult, FeatureExtractor};
use crate::orchestrator::errors::{OrchestratorError, OrchestratorResult};
use crate::orchestrator::state::ProcessingState;
use crate::raster::{CanonicalImage, RasterDecoder};

#[derive(Debug, Default)]
struct Session {
    state: ProcessingState,
    image: Option<Arc<CanonicalImage>>,
    query: Option<String>,
    result: Option<ExtractionResult>,
    last_error: Option<String>,
}

impl Session {
    fn clear(&mut self) {
        *self = Session::default();
    }
}

/// Error recorded when a submit future is dropped mid-request
const ABANDONED_REQUEST: &str = "request abandoned";

/// Fails the session if dropped while armed
struct InFlight<'o> {
    orchestrator: &'o ExtractionOrchestrator,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.orchestrator.abandon();
        }
    }
}

/// Drives one image through decode and extraction
pub struct ExtractionOrchestrator {
    extractor: Arc<dyn FeatureExtractor>,
    decoder: RasterDecoder,
    default_max_tokens: Option<u32>,
    session: Mutex<Session>,
    state_tx: watch::Sender<ProcessingState>,
}

impl ExtractionOrchestrator {
    /// Creates an idle orchestrator using `extractor` for every request
    pub fn new(extractor: Arc<dyn FeatureExtractor>) -> Self {
        let (state_tx, _) = watch::channel(ProcessingState::Idle);
        ExtractionOrchestrator {
            extractor,
            decoder: RasterDecoder::default(),
            default_max_tokens: None,
            session: Mutex::new(Session::default()),
            state_tx,
        }
    }

    /// Use `decoder` for `load_file` and `load_bytes`
    pub fn with_decoder(mut self, decoder: RasterDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Token budget sent by `submit`
    pub fn with_default_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.default_max_tokens = max_tokens;
        self
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, session: &mut Session, state: ProcessingState) {
        debug!("Orchestrator state {} -> {}", session.state, state);
        session.state = state;
        self.state_tx.send_replace(state);
    }

    /// Accept a decoded image, discarding any previous query and result
    pub fn load_image(&self, image: CanonicalImage) -> OrchestratorResult<()> {
        let mut session = self.session();
        if session.state == ProcessingState::Processing {
            return Err(OrchestratorError::RequestInFlight);
        }

        info!("Loaded {} ({}x{})", image.file_name(), image.width(), image.height());
        session.query = None;
        session.result = None;
        session.last_error = None;
        session.image = Some(Arc::new(image));
        self.set_state(&mut session, ProcessingState::Idle);
        Ok(())
    }

    /// Decode `bytes` named `file_name` and load the image
    pub async fn load_bytes(&self, bytes: Vec<u8>, file_name: &str) -> OrchestratorResult<()> {
        if self.state() == ProcessingState::Processing {
            return Err(OrchestratorError::RequestInFlight);
        }
        let image = self.decoder.decode_async(bytes, file_name.to_string()).await?;
        self.accept_upload(image)
    }

    /// Loads a freshly decoded upload; a submit may have started during the decode
    fn accept_upload(&self, image: CanonicalImage) -> OrchestratorResult<()> {
        let file_name = image.file_name().to_string();
        self.load_image(image).inspect_err(|e| {
            if matches!(e, OrchestratorError::RequestInFlight) {
                warn!("Discarded decoded upload {}: a request started while it was decoding", file_name);
            }
        })
    }

    /// Read, decode and load the file at `path`
    pub async fn load_file(&self, path: &Path) -> OrchestratorResult<()> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.load_bytes(bytes, &file_name).await
    }

    /// Submit `query` against the loaded image with the default budget
    pub async fn submit(&self, query: &str) -> OrchestratorResult<ExtractionResult> {
        self.submit_with_budget(query, self.default_max_tokens).await
    }

    /// Submit `query` against the loaded image
    ///
    /// # Returns
    /// The result once the extractor answers. `RequestInFlight`,
    /// `NoImageLoaded` and `EmptyQuery` reject the call without changing
    /// any state. An extractor error moves the orchestrator to `Failed`.
    pub async fn submit_with_budget(&self, query: &str, max_tokens: Option<u32>) -> OrchestratorResult<ExtractionResult> {
        let request = {
            let mut session = self.session();
            if session.state == ProcessingState::Processing {
                warn!("Rejected submit while a request is processing");
                return Err(OrchestratorError::RequestInFlight);
            }
            let image = session.image.clone().ok_or(OrchestratorError::NoImageLoaded)?;
            let query = query.trim();
            if query.is_empty() {
                return Err(OrchestratorError::EmptyQuery);
            }

            session.query = Some(query.to_string());
            session.result = None;
            session.last_error = None;
            self.set_state(&mut session, ProcessingState::Processing);

            ExtractionRequest { image, query: query.to_string(), max_tokens }
        };

        info!("Submitting query {:?}", request.query);
        let guard = InFlight { orchestrator: self, armed: true };
        let outcome = self.extractor.extract(&request).await;
        guard.disarm();

        let mut session = self.session();
        match outcome {
            Ok(result) => {
                info!("Extraction completed from {} with {} masks", result.source, result.masks.len());
                session.result = Some(result.clone());
                self.set_state(&mut session, ProcessingState::Completed);
                Ok(result)
            }
            Err(e) => {
                warn!("Extraction failed: {}", e);
                session.result = None;
                session.last_error = Some(e.to_string());
                self.set_state(&mut session, ProcessingState::Failed);
                Err(OrchestratorError::Extraction(e))
            }
        }
    }

    /// Moves an abandoned request to `Failed`
    fn abandon(&self) {
        let mut session = self.session();
        if session.state == ProcessingState::Processing {
            warn!("Request for {:?} abandoned before the extractor answered", session.query);
            session.result = None;
            session.last_error = Some(ABANDONED_REQUEST.to_string());
            self.set_state(&mut session, ProcessingState::Failed);
        }
    }

    /// Clear image, query and result and return to `Idle`
    pub fn reset(&self) -> OrchestratorResult<()> {
        let mut session = self.session();
        if session.state == ProcessingState::Processing {
            return Err(OrchestratorError::RequestInFlight);
        }
        session.clear();
        self.set_state(&mut session, ProcessingState::Idle);
        Ok(())
    }

    pub fn state(&self) -> ProcessingState {
        self.session().state
    }

    pub fn image(&self) -> Option<Arc<CanonicalImage>> {
        self.session().image.clone()
    }

    /// The query of the current or last request
    pub fn query(&self) -> Option<String> {
        self.session().query.clone()
    }

    /// The latest result, present only in `Completed`
    pub fn result(&self) -> Option<ExtractionResult> {
        self.session().result.clone()
    }

    /// The error text of the last failed request
    pub fn last_error(&self) -> Option<String> {
        self.session().last_error.clone()
    }

    /// Receiver that observes every state change
    pub fn subscribe(&self) -> watch::Receiver<ProcessingState> {
        self.state_tx.subscribe()
    }
}
