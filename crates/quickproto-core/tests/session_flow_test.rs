//! Integration test: session controller flows against a scripted in-process service.
//!
//! Verifies that:
//! 1. Empty prompts never reach the service.
//! 2. Successful generations replace the artifact and render exactly once.
//! 3. Failures surface the generic message and return to idle.
//! 4. Only the latest generation may update the session (stale completions discarded).
//! 5. The quote loading state outlives the response by the configured floor.
//! 6. Quote handles are revoked on replacement and on shutdown.
//! 7. `next_event` stops waiting once every request task has reported back.

use async_trait::async_trait;
use quickproto_core::{
    DisplayStrategy, GeneratedArtifact, MemoryPreview, PrototypeKind, PrototypeService,
    ServiceError, ServiceResult, SessionController, SyntaxMode, GENERATION_FAILED_MESSAGE,
    PROMPT_REQUIRED_MESSAGE, QUOTE_FAILED_MESSAGE,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;

type GenerateGate = oneshot::Receiver<ServiceResult<GeneratedArtifact>>;

/// Scripted service: per-prompt gates for ordering races, FIFO scripts otherwise.
#[derive(Default)]
struct ScriptedService {
    generate_calls: AtomicUsize,
    quote_calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    quote_requests: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, GenerateGate>>,
    generations: Mutex<VecDeque<ServiceResult<GeneratedArtifact>>>,
    quotes: Mutex<VecDeque<ServiceResult<Vec<u8>>>>,
}

impl ScriptedService {
    fn push_generation(&self, r: ServiceResult<GeneratedArtifact>) {
        self.generations.lock().unwrap().push_back(r);
    }

    fn push_quote(&self, r: ServiceResult<Vec<u8>>) {
        self.quotes.lock().unwrap().push_back(r);
    }

    fn gate(&self, prompt: &str) -> oneshot::Sender<ServiceResult<GeneratedArtifact>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(prompt.to_string(), rx);
        tx
    }
}

#[async_trait]
impl PrototypeService for ScriptedService {
    async fn generate(&self, prompt: &str) -> ServiceResult<GeneratedArtifact> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let gate = self.gates.lock().unwrap().remove(prompt);
        match gate {
            Some(rx) => rx.await.unwrap_or(Err(ServiceError::Status(599))),
            None => self
                .generations
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ServiceError::Status(503))),
        }
    }

    async fn quote(&self, request: &str) -> ServiceResult<Vec<u8>> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.quote_requests.lock().unwrap().push(request.to_string());
        self.quotes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ServiceError::Status(503)))
    }
}

fn controller(
    service: &Arc<ScriptedService>,
    quote_dir: &std::path::Path,
) -> SessionController<MemoryPreview> {
    let service: Arc<dyn PrototypeService> = service.clone();
    SessionController::new(
        service,
        MemoryPreview::new(),
        tokio::runtime::Handle::current(),
        quote_dir,
    )
    .with_quote_floor(Duration::from_secs(30))
}

#[tokio::test]
async fn empty_prompt_never_calls_service() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(ScriptedService::default());
    let mut session = controller(&service, dir.path());

    for prompt in ["", "   ", "\n\t "] {
        session.set_prompt(prompt);
        assert!(session.submit_prompt().is_none());
        assert_eq!(session.error(), Some(PROMPT_REQUIRED_MESSAGE));
        assert!(!session.is_generating());
    }

    tokio::task::yield_now().await;
    assert_eq!(session.pump(), 0);
    assert_eq!(service.generate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn successful_generation_replaces_artifact_and_renders_once() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(ScriptedService::default());
    service.push_generation(Ok(GeneratedArtifact::new("X")
        .with_languages(["L"])
        .with_prelude("P")));
    let mut session = controller(&service, dir.path());

    session.set_prompt("  a landing page  ");
    assert!(session.submit_prompt().is_some());
    assert!(session.is_generating());
    assert_eq!(session.error(), None);

    assert!(session.next_event().await);
    let artifact = session.artifact().expect("artifact");
    assert_eq!(artifact.code, "X");
    assert_eq!(artifact.languages[0], "L");
    assert_eq!(artifact.prelude(), Some("P"));
    assert_eq!(session.syntax_mode(), Some(SyntaxMode::Other("l".to_string())));
    assert!(!session.is_generating());

    assert_eq!(session.renderer().render_count(), 1);
    assert_eq!(session.renderer().document(), Some("X"));
    assert_eq!(service.prompts.lock().unwrap().as_slice(), ["a landing page"]);
}

#[tokio::test]
async fn generation_without_prelude_or_languages() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(ScriptedService::default());
    service.push_generation(Ok(GeneratedArtifact::new("<p>hi</p>")));
    let mut session = controller(&service, dir.path());

    session.set_prompt("hi");
    session.submit_prompt();
    session.next_event().await;

    let artifact = session.artifact().unwrap();
    assert_eq!(artifact.prelude(), None);
    assert_eq!(session.syntax_mode(), None);
}

#[tokio::test]
async fn empty_code_is_stored_but_not_rendered() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(ScriptedService::default());
    service.push_generation(Ok(GeneratedArtifact::new("")));
    let mut session = controller(&service, dir.path());

    session.set_prompt("nothing");
    session.submit_prompt();
    session.next_event().await;

    assert!(session.artifact().is_some());
    assert_eq!(session.renderer().render_count(), 0);
}

#[tokio::test]
async fn failed_generation_keeps_artifact_and_sets_generic_error() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(ScriptedService::default());
    service.push_generation(Ok(GeneratedArtifact::new("first")));
    service.push_generation(Err(ServiceError::Status(500)));
    service.push_generation(Err(ServiceError::Decode("bad json".into())));
    let mut session = controller(&service, dir.path());

    session.set_prompt("one");
    session.submit_prompt();
    session.next_event().await;
    assert_eq!(session.artifact().unwrap().code, "first");

    for _ in 0..2 {
        session.submit_prompt();
        session.next_event().await;
        assert_eq!(session.error(), Some(GENERATION_FAILED_MESSAGE));
        assert!(!session.is_generating());
        assert_eq!(session.artifact().unwrap().code, "first");
    }
    assert_eq!(session.renderer().render_count(), 1);
}

#[tokio::test]
async fn latest_submission_wins_regardless_of_arrival_order() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(ScriptedService::default());
    let alpha = service.gate("alpha");
    let beta = service.gate("beta");
    let mut session = controller(&service, dir.path());

    session.set_prompt("alpha");
    let first = session.submit_prompt().unwrap();
    session.set_prompt("beta");
    let second = session.submit_prompt().unwrap();
    assert!(second > first);

    // Latest resolves first; the superseded one arrives afterwards.
    beta.send(Ok(GeneratedArtifact::new("B"))).unwrap();
    session.next_event().await;
    assert_eq!(session.artifact().unwrap().code, "B");
    assert!(!session.is_generating());

    alpha.send(Ok(GeneratedArtifact::new("A"))).unwrap();
    session.next_event().await;
    assert_eq!(session.artifact().unwrap().code, "B");
    assert_eq!(session.stale_discarded(), 1);
    assert_eq!(session.renderer().render_count(), 1);

    // Neither call was cancelled.
    assert_eq!(service.generate_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn next_event_returns_false_once_nothing_is_outstanding() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(ScriptedService::default());
    let alpha = service.gate("alpha");
    service.push_generation(Ok(GeneratedArtifact::new("B")));
    service.push_quote(Ok(b"%PDF".to_vec()));
    let mut session = controller(&service, dir.path());

    assert_eq!(session.in_flight(), 0);
    assert!(!session.next_event().await);

    session.set_prompt("alpha");
    session.submit_prompt();
    session.set_prompt("beta");
    session.submit_prompt();
    session.request_quote();
    assert_eq!(session.in_flight(), 3);

    // Superseded generation still counts until its completion is applied.
    alpha.send(Ok(GeneratedArtifact::new("A"))).unwrap();
    while session.next_event().await {}

    assert_eq!(session.in_flight(), 0);
    assert_eq!(session.artifact().unwrap().code, "B");
    assert_eq!(session.stale_discarded(), 1);
    assert!(!session.is_quote_loading());
    assert!(session.quote().is_some());
    assert!(!session.next_event().await);
}

#[tokio::test]
async fn stale_completion_cannot_clear_pending_state_or_set_error() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(ScriptedService::default());
    let alpha = service.gate("alpha");
    let beta = service.gate("beta");
    let mut session = controller(&service, dir.path());

    session.set_prompt("alpha");
    session.submit_prompt();
    session.set_prompt("beta");
    session.submit_prompt();

    alpha.send(Err(ServiceError::Status(502))).unwrap();
    session.next_event().await;
    assert!(session.is_generating());
    assert_eq!(session.error(), None);
    assert!(session.artifact().is_none());

    beta.send(Ok(GeneratedArtifact::new("B"))).unwrap();
    session.next_event().await;
    assert!(!session.is_generating());
    assert_eq!(session.artifact().unwrap().code, "B");
}

#[tokio::test(start_paused = true)]
async fn quote_stays_loading_for_floor_after_response() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(ScriptedService::default());
    service.push_quote(Ok(b"%PDF-1.7 quote".to_vec()));
    let mut session = controller(&service, dir.path());

    session.set_prompt("  online store  ");
    session.request_quote();
    assert!(session.is_quote_loading());

    assert!(session.next_event().await);
    let settled_at = Instant::now();
    let doc = session.quote().expect("quote document");
    assert_eq!(std::fs::read(doc.path()).unwrap(), b"%PDF-1.7 quote");
    assert!(session.is_quote_loading());
    assert_eq!(service.quote_requests.lock().unwrap().as_slice(), ["online store"]);

    assert!(session.next_event().await);
    assert!(Instant::now() - settled_at >= Duration::from_secs(30));
    assert!(!session.is_quote_loading());
    assert!(session.quote().is_some());
}

#[tokio::test(start_paused = true)]
async fn failed_quote_sets_error_and_still_honours_floor() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(ScriptedService::default());
    service.push_quote(Err(ServiceError::Status(500)));
    let mut session = controller(&service, dir.path());

    session.request_quote();
    session.next_event().await;
    assert_eq!(session.error(), Some(QUOTE_FAILED_MESSAGE));
    assert!(session.quote().is_none());
    assert!(session.is_quote_loading());

    session.next_event().await;
    assert!(!session.is_quote_loading());
}

#[tokio::test(start_paused = true)]
async fn new_quote_revokes_previous_handle_and_shutdown_revokes_live_one() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(ScriptedService::default());
    service.push_quote(Ok(b"first".to_vec()));
    service.push_quote(Ok(b"second".to_vec()));
    let mut session = controller(&service, dir.path());

    session.request_quote();
    session.next_event().await;
    session.next_event().await;
    let first = session.quote().unwrap().path().to_path_buf();
    assert!(first.exists());

    session.request_quote();
    session.next_event().await;
    let second = session.quote().unwrap().path().to_path_buf();
    assert!(!first.exists());
    assert!(second.exists());

    session.shutdown();
    assert!(session.quote().is_none());
    assert!(!second.exists());
}

#[tokio::test]
async fn a_new_flow_clears_the_shared_error_slot() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(ScriptedService::default());
    service.push_generation(Err(ServiceError::Status(500)));
    let mut session = controller(&service, dir.path())
        .with_quote_floor(Duration::from_millis(1));

    session.set_prompt("x");
    session.submit_prompt();
    session.next_event().await;
    assert_eq!(session.error(), Some(GENERATION_FAILED_MESSAGE));

    session.request_quote();
    assert_eq!(session.error(), None);
}

#[tokio::test]
async fn display_strategy_rerenders_live_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(ScriptedService::default());
    service.push_generation(Ok(GeneratedArtifact::new("<b>hi</b>")));
    let mut session = controller(&service, dir.path());

    session.set_display(DisplayStrategy::Variant(PrototypeKind::Script));
    assert_eq!(session.renderer().render_count(), 0);

    session.set_prompt("hi");
    session.submit_prompt();
    session.next_event().await;
    let doc = session.renderer().document().unwrap().to_string();
    assert!(doc.contains("Script/Utilities Prototype"));
    assert!(doc.contains("&lt;b&gt;hi&lt;/b&gt;"));

    session.set_display(DisplayStrategy::Generic);
    assert_eq!(session.renderer().document(), Some("<b>hi</b>"));
    assert_eq!(session.renderer().render_count(), 2);

    session.set_display(DisplayStrategy::Generic);
    assert_eq!(session.renderer().render_count(), 2);
}
