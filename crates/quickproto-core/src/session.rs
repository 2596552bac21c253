//! Prototype session controller.
//!
//! Owns every piece of mutable session state: the prompt, the live artifact, the live quote
//! handle, both loading flags and the shared error slot. Network calls run as tasks on a
//! tokio runtime; their completions come back as [`FlowEvent`]s tagged with a
//! [`RequestId`] and are applied on the owning thread by [`SessionController::pump`] or
//! [`SessionController::next_event`]. Only the latest request of each flow may touch
//! shared state; older completions are discarded.

use crate::artifact::{GeneratedArtifact, SyntaxMode};
use crate::config::ClientConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::preview::PreviewRenderer;
use crate::quote::QuoteDocument;
use crate::service::PrototypeService;
use crate::variants::DisplayStrategy;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

pub const PROMPT_REQUIRED_MESSAGE: &str = "Please enter a prompt.";
pub const GENERATION_FAILED_MESSAGE: &str = "An error occurred while generating the prototype.";
pub const QUOTE_FAILED_MESSAGE: &str = "An error occurred while getting the quote.";

/// Monotonically increasing tag of one issued network request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Completion signals sent from request tasks back to the controller.
#[derive(Debug)]
pub enum FlowEvent {
    Generated {
        id: RequestId,
        outcome: ServiceResult<GeneratedArtifact>,
    },
    QuoteSettled {
        id: RequestId,
        outcome: ServiceResult<QuoteDocument>,
    },
    /// The minimum visible loading time after settlement has passed.
    QuoteFloorElapsed { id: RequestId },
}

/// Loading state that resolves only when the call has settled *and* the floor has elapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFloor {
    current: Option<RequestId>,
    settled: bool,
    floor_elapsed: bool,
}

impl LoadingFloor {
    pub fn begin(&mut self, id: RequestId) {
        *self = Self {
            current: Some(id),
            settled: false,
            floor_elapsed: false,
        };
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        self.current == Some(id)
    }

    pub fn settle(&mut self, id: RequestId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.settled = true;
        true
    }

    pub fn elapse(&mut self, id: RequestId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.floor_elapsed = true;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.current.is_some() && !(self.settled && self.floor_elapsed)
    }
}

/// Called from request tasks after an event is queued (e.g. to request a UI repaint).
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

pub struct SessionController<R: PreviewRenderer> {
    service: Arc<dyn PrototypeService>,
    runtime: Handle,
    events_tx: mpsc::UnboundedSender<FlowEvent>,
    events_rx: mpsc::UnboundedReceiver<FlowEvent>,
    renderer: R,
    notifier: Option<Notifier>,
    quote_dir: PathBuf,
    quote_floor: Duration,
    display: DisplayStrategy,

    prompt: String,
    artifact: Option<GeneratedArtifact>,
    quote: Option<QuoteDocument>,
    error: Option<String>,

    next_id: u64,
    latest_generation: Option<RequestId>,
    generating: bool,
    quote_loading: LoadingFloor,
    /// Spawned request tasks whose final event has not been applied yet.
    in_flight: usize,
    stale_discarded: u64,
}

impl<R: PreviewRenderer> SessionController<R> {
    /// `runtime` runs the request tasks; the controller itself stays on the caller's thread.
    pub fn new(
        service: Arc<dyn PrototypeService>,
        renderer: R,
        runtime: Handle,
        quote_dir: impl Into<PathBuf>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            service,
            runtime,
            events_tx,
            events_rx,
            renderer,
            notifier: None,
            quote_dir: quote_dir.into(),
            quote_floor: Duration::from_secs(crate::config::DEFAULT_QUOTE_LOADING_FLOOR_SECS),
            display: DisplayStrategy::default(),
            prompt: String::new(),
            artifact: None,
            quote: None,
            error: None,
            next_id: 0,
            latest_generation: None,
            generating: false,
            quote_loading: LoadingFloor::default(),
            in_flight: 0,
            stale_discarded: 0,
        }
    }

    pub fn from_config(
        config: &ClientConfig,
        service: Arc<dyn PrototypeService>,
        renderer: R,
        runtime: Handle,
    ) -> Self {
        Self::new(service, renderer, runtime, config.quote_dir())
            .with_quote_floor(config.quote_loading_floor())
    }

    pub fn with_quote_floor(mut self, floor: Duration) -> Self {
        self.quote_floor = floor;
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn prompt_mut(&mut self) -> &mut String {
        &mut self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    fn issue_id(&mut self) -> RequestId {
        self.next_id += 1;
        RequestId(self.next_id)
    }

    /// Validate the prompt and start a generation request. Returns `None` when the trimmed
    /// prompt is empty (no request issued, validation message set).
    pub fn submit_prompt(&mut self) -> Option<RequestId> {
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            tracing::debug!("empty prompt rejected");
            self.error = Some(PROMPT_REQUIRED_MESSAGE.to_string());
            return None;
        }

        let id = self.issue_id();
        if self.generating {
            tracing::debug!(request = %id, "superseding pending generation");
        }
        self.latest_generation = Some(id);
        self.generating = true;
        self.error = None;
        tracing::info!(request = %id, prompt_len = prompt.len(), "submitting prompt");

        let service = Arc::clone(&self.service);
        let tx = self.events_tx.clone();
        let notifier = self.notifier.clone();
        self.in_flight += 1;
        self.runtime.spawn(async move {
            let outcome = service.generate(&prompt).await;
            if tx.send(FlowEvent::Generated { id, outcome }).is_ok() {
                notify(&notifier);
            }
        });
        Some(id)
    }

    /// Start a quote request for the trimmed prompt (no emptiness check).
    pub fn request_quote(&mut self) -> RequestId {
        let request = self.prompt.trim().to_string();
        let id = self.issue_id();
        self.quote_loading.begin(id);
        self.error = None;
        tracing::info!(request = %id, "requesting quote");

        let service = Arc::clone(&self.service);
        let tx = self.events_tx.clone();
        let notifier = self.notifier.clone();
        let dir = self.quote_dir.clone();
        let floor = self.quote_floor;
        self.in_flight += 1;
        self.runtime.spawn(async move {
            let outcome = match service.quote(&request).await {
                Ok(bytes) => QuoteDocument::store(dir, bytes).await.map_err(ServiceError::from),
                Err(e) => Err(e),
            };
            if tx.send(FlowEvent::QuoteSettled { id, outcome }).is_err() {
                return;
            }
            notify(&notifier);

            tokio::time::sleep(floor).await;
            if tx.send(FlowEvent::QuoteFloorElapsed { id }).is_ok() {
                notify(&notifier);
            }
        });
        id
    }

    /// Apply every queued completion without blocking. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it. Returns `false` at once when no request
    /// task is outstanding.
    pub async fn next_event(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, event: FlowEvent) {
        if matches!(
            event,
            FlowEvent::Generated { .. } | FlowEvent::QuoteFloorElapsed { .. }
        ) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        match event {
            FlowEvent::Generated { id, outcome } => self.apply_generated(id, outcome),
            FlowEvent::QuoteSettled { id, outcome } => self.apply_quote(id, outcome),
            FlowEvent::QuoteFloorElapsed { id } => {
                if self.quote_loading.elapse(id) {
                    tracing::debug!(request = %id, "quote loading floor elapsed");
                }
            }
        }
    }

    fn apply_generated(&mut self, id: RequestId, outcome: ServiceResult<GeneratedArtifact>) {
        if self.latest_generation != Some(id) {
            self.stale_discarded += 1;
            tracing::debug!(request = %id, ok = outcome.is_ok(), "discarding stale generation");
            return;
        }
        self.generating = false;
        match outcome {
            Ok(artifact) => {
                tracing::info!(request = %id, code_len = artifact.code.len(), "prototype generated");
                self.install_artifact(artifact);
            }
            Err(e) => {
                tracing::error!(request = %id, error = %e, "prototype generation failed");
                self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
            }
        }
    }

    fn apply_quote(&mut self, id: RequestId, outcome: ServiceResult<QuoteDocument>) {
        if !self.quote_loading.settle(id) {
            self.stale_discarded += 1;
            tracing::debug!(request = %id, "discarding stale quote");
            if let Ok(doc) = outcome {
                doc.revoke();
            }
            return;
        }
        match outcome {
            Ok(doc) => self.install_quote(doc),
            Err(e) => {
                tracing::error!(request = %id, error = %e, "quote request failed");
                self.error = Some(QUOTE_FAILED_MESSAGE.to_string());
            }
        }
    }

    fn install_artifact(&mut self, artifact: GeneratedArtifact) {
        let render = artifact.has_code();
        self.artifact = Some(artifact);
        if render {
            self.render_current();
        }
    }

    fn render_current(&mut self) {
        if let Some(artifact) = self.artifact.as_ref().filter(|a| a.has_code()) {
            let document = self.display.document(&artifact.code);
            self.renderer.render(&document);
        }
    }

    /// Revoke the previous handle before the new one becomes live.
    fn install_quote(&mut self, doc: QuoteDocument) {
        if let Some(previous) = self.quote.take() {
            previous.revoke();
        }
        tracing::info!(path = %doc.path().display(), bytes = doc.size(), "quote document ready");
        self.quote = Some(doc);
    }

    /// Switch display strategy; re-renders the live artifact when the strategy changes.
    pub fn set_display(&mut self, display: DisplayStrategy) {
        if self.display == display {
            return;
        }
        self.display = display;
        self.render_current();
    }

    pub fn display(&self) -> DisplayStrategy {
        self.display
    }

    pub fn artifact(&self) -> Option<&GeneratedArtifact> {
        self.artifact.as_ref()
    }

    pub fn syntax_mode(&self) -> Option<SyntaxMode> {
        self.artifact.as_ref().and_then(GeneratedArtifact::syntax_mode)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn is_quote_loading(&self) -> bool {
        self.quote_loading.is_loading()
    }

    pub fn quote(&self) -> Option<&QuoteDocument> {
        self.quote.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn preview_location(&self) -> Option<&Path> {
        self.renderer.location()
    }

    /// Request tasks still to report back, superseded ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Completions that arrived for superseded requests.
    pub fn stale_discarded(&self) -> u64 {
        self.stale_discarded
    }

    /// Release the live quote handle. Also runs on drop.
    pub fn shutdown(&mut self) {
        if let Some(doc) = self.quote.take() {
            doc.revoke();
        }
    }
}

impl<R: PreviewRenderer> Drop for SessionController<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn notify(notifier: &Option<Notifier>) {
    if let Some(n) = notifier {
        n();
    }
}
