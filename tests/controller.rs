use std::sync::{Arc, Mutex};
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vgen::{
    ApiConfig, ControllerConfig, ControllerState, DisplaySink, GenerationController, ImageData,
    ModelKind, ProgressState, Result, StudioClient, SubmitOutcome, VgenError,
};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug, Clone, PartialEq)]
enum SinkEvent {
    Busy(bool),
    Progress(u8),
    Rendered(usize),
    Error(String),
    Elapsed(f64),
    Cleared,
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
    fail_render: bool,
}

impl RecordingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn failing_render() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
            fail_render: true,
        })
    }

    fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    fn progress_values(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Progress(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: SinkEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl DisplaySink for RecordingSink {
    fn set_busy(&self, busy: bool) {
        self.push(SinkEvent::Busy(busy));
    }

    fn set_progress(&self, state: &ProgressState) {
        self.push(SinkEvent::Progress(state.percent));
    }

    fn render_image(&self, image: &ImageData) -> Result<()> {
        if self.fail_render {
            return Err(VgenError::RenderError(
                "unable to decode image data".to_string(),
            ));
        }
        self.push(SinkEvent::Rendered(image.len()));
        Ok(())
    }

    fn show_error(&self, message: &str) {
        self.push(SinkEvent::Error(message.to_string()));
    }

    fn show_elapsed(&self, seconds: f64) {
        self.push(SinkEvent::Elapsed(seconds));
    }

    fn clear(&self) {
        self.push(SinkEvent::Cleared);
    }
}

fn client_for(server: &MockServer) -> StudioClient {
    let config = ApiConfig::new()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_secs(5));
    StudioClient::new(config).expect("client builds")
}

/// A fast ramp so tests observe several ticks within a short delay.
fn test_config(kind: ModelKind) -> ControllerConfig {
    let base = match kind {
        ModelKind::Fast => ControllerConfig::fast(),
        ModelKind::Quality => ControllerConfig::quality(),
    };
    base.with_ramp(20, Duration::from_millis(30))
}

#[tokio::test]
async fn empty_input_sends_no_request_and_stays_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PNG_MAGIC, "image/png"))
        .mount(&server)
        .await;

    let sink = RecordingSink::new();
    let controller =
        GenerationController::new(client_for(&server), test_config(ModelKind::Fast), sink.clone());

    let outcome = controller.submit("   ").await;

    assert!(matches!(outcome, SubmitOutcome::RejectedEmptyInput));
    assert_eq!(controller.state(), ControllerState::Idle);
    assert!(server.received_requests().await.unwrap().is_empty());

    let events = sink.events();
    assert!(events.iter().any(|e| matches!(e, SinkEvent::Error(_))));
    assert!(!events.contains(&SinkEvent::Busy(true)));
}

#[tokio::test]
async fn progress_hits_100_exactly_once_after_settlement() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/generate/fast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(PNG_MAGIC, "image/png")
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let sink = RecordingSink::new();
    let controller =
        GenerationController::new(client_for(&server), test_config(ModelKind::Fast), sink.clone());

    let outcome = controller.submit("a prompt").await;
    assert!(outcome.is_completed());

    let progress = sink.progress_values();
    assert!(progress.len() >= 2, "expected simulated ticks, got {:?}", progress);
    assert_eq!(*progress.last().unwrap(), 100);
    assert!(progress[..progress.len() - 1].iter().all(|&p| p < 100));

    // The image renders only after progress was forced to completion.
    let events = sink.events();
    let complete_at = events
        .iter()
        .position(|e| *e == SinkEvent::Progress(100))
        .unwrap();
    let rendered_at = events
        .iter()
        .position(|e| matches!(e, SinkEvent::Rendered(_)))
        .unwrap();
    assert!(complete_at < rendered_at);
    assert_eq!(events.last(), Some(&SinkEvent::Busy(false)));
}

#[tokio::test]
async fn failure_restores_idle_and_a_corrected_resubmission_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/generate/quality"))
        .respond_with(
            ResponseTemplate::new(422).set_body_raw(r#"{"message": "bad input"}"#, "application/json"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/generate/quality"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PNG_MAGIC, "image/png"))
        .mount(&server)
        .await;

    let sink = RecordingSink::new();
    let controller = GenerationController::new(
        client_for(&server),
        test_config(ModelKind::Quality),
        sink.clone(),
    );

    let first = controller.submit("a prompt").await;
    match first {
        SubmitOutcome::Failed(message) => assert_eq!(message, "bad input"),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(controller.state(), ControllerState::Idle);
    let events = sink.events();
    assert!(events.contains(&SinkEvent::Error("bad input".to_string())));
    assert_eq!(events.last(), Some(&SinkEvent::Busy(false)));

    let second = controller.submit("a corrected prompt").await;
    assert!(second.is_completed());
    assert_eq!(controller.state(), ControllerState::Idle);
}

#[tokio::test]
async fn fast_and_quality_run_in_flight_simultaneously_without_interference() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/generate/fast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"fast result".as_slice(), "image/png")
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/generate/quality"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"quality result".as_slice(), "image/png")
                .set_delay(Duration::from_millis(220)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let fast_sink = RecordingSink::new();
    let quality_sink = RecordingSink::new();
    let fast =
        GenerationController::new(client.clone(), test_config(ModelKind::Fast), fast_sink.clone());
    let quality = GenerationController::new(
        client.clone(),
        test_config(ModelKind::Quality),
        quality_sink.clone(),
    );

    let (fast_outcome, quality_outcome) =
        tokio::join!(fast.submit("same prompt"), quality.submit("same prompt"));

    match (&fast_outcome, &quality_outcome) {
        (SubmitOutcome::Completed(f), SubmitOutcome::Completed(q)) => {
            assert_eq!(f.image.bytes, b"fast result");
            assert_eq!(q.image.bytes, b"quality result");
        }
        other => panic!("expected both completed, got {:?}", other),
    }

    // Each sink saw exactly its own submission settle.
    for sink in [&fast_sink, &quality_sink] {
        let events = sink.events();
        let rendered = events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Rendered(_)))
            .count();
        assert_eq!(rendered, 1);
        assert_eq!(*sink.progress_values().last().unwrap(), 100);
    }
    assert_eq!(
        fast_sink
            .events()
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Rendered(len) => Some(*len),
                _ => None,
            })
            .next(),
        Some(b"fast result".len())
    );
}

#[tokio::test]
async fn submission_while_in_flight_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/generate/fast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(PNG_MAGIC, "image/png")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let sink = RecordingSink::new();
    let controller = Arc::new(GenerationController::new(
        client_for(&server),
        test_config(ModelKind::Fast),
        sink,
    ));

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit("a prompt").await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(controller.state(), ControllerState::InFlight);
    let second = controller.submit("another prompt").await;
    assert!(matches!(second, SubmitOutcome::RejectedBusy));

    let first = first.await.unwrap();
    assert!(first.is_completed());
    assert_eq!(controller.state(), ControllerState::Idle);
    // Exactly one request went out despite two submit calls.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn render_failure_is_surfaced_as_its_own_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/generate/fast"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"corrupt".as_slice(), "image/png"))
        .mount(&server)
        .await;

    let sink = RecordingSink::failing_render();
    let controller =
        GenerationController::new(client_for(&server), test_config(ModelKind::Fast), sink.clone());

    let outcome = controller.submit("a prompt").await;
    match outcome {
        SubmitOutcome::Failed(message) => assert!(message.contains("unable to decode")),
        other => panic!("expected render failure, got {:?}", other),
    }
    assert_eq!(controller.state(), ControllerState::Idle);
    assert_eq!(sink.events().last(), Some(&SinkEvent::Busy(false)));
}

#[tokio::test]
async fn invalidated_submission_applies_no_result_to_the_display() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/generate/fast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(PNG_MAGIC, "image/png")
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let sink = RecordingSink::new();
    let controller = Arc::new(GenerationController::new(
        client_for(&server),
        test_config(ModelKind::Fast),
        sink.clone(),
    ));

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit("a prompt").await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.invalidate();

    pending.await.unwrap();
    let events = sink.events();
    assert!(!events.iter().any(|e| matches!(e, SinkEvent::Rendered(_))));
    assert!(!events.contains(&SinkEvent::Progress(100)));
    assert!(!events.iter().any(|e| matches!(e, SinkEvent::Elapsed(_))));

    // The display must not stay stuck busy: suppressing the stale result
    // does not suppress returning the trigger to enabled.
    let busy_events: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            SinkEvent::Busy(b) => Some(*b),
            _ => None,
        })
        .collect();
    assert_eq!(busy_events, vec![true, false]);
    assert_eq!(controller.state(), ControllerState::Idle);
}

#[tokio::test]
async fn attached_image_rides_along_until_cleared() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/generate/fast"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PNG_MAGIC, "image/png"))
        .mount(&server)
        .await;

    let sink = RecordingSink::new();
    let controller =
        GenerationController::new(client_for(&server), test_config(ModelKind::Fast), sink);

    controller.attach_image(ImageData::from_bytes(b"slot image".to_vec(), "image/png"));
    assert!(controller.attached_image().is_some());

    // Image alone, no prompt, is valid input.
    let outcome = controller.submit("").await;
    assert!(outcome.is_completed());
    let body = &server.received_requests().await.unwrap()[0].body;
    assert!(body
        .windows(b"slot image".len())
        .any(|window| window == b"slot image"));

    controller.clear_image();
    assert!(controller.attached_image().is_none());
    let rejected = controller.submit("").await;
    assert!(matches!(rejected, SubmitOutcome::RejectedEmptyInput));
}
