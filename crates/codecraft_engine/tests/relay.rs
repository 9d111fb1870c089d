use std::sync::{Arc, Mutex};

use codecraft_engine::{
    EngineEvent, FailureKind, Generator, ProgressSink, RelayClient, RelaySettings, SiteRequest,
    StyleChoice,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn relay_for(server: &MockServer) -> RelayClient {
    RelayClient::new(RelaySettings {
        endpoint: format!("{}/api/generate", server.uri()),
        ..RelaySettings::default()
    })
}

fn site_request() -> SiteRequest {
    SiteRequest {
        prompt: "a countdown page".to_string(),
        style: StyleChoice::NoCss,
    }
}

#[tokio::test]
async fn relay_response_is_reassembled_and_decoded() {
    let server = MockServer::start().await;
    let html = "<!DOCTYPE html><html><body>relayed</body></html>";
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                serde_json::to_string(&json!({ "html": html })).unwrap(),
                "text/plain",
            ),
        )
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let transcript = relay_for(&server)
        .generate(1, &site_request(), &sink)
        .await
        .expect("relay ok");
    assert_eq!(transcript.text, html);

    let events = sink.take();
    assert!(matches!(
        events.first(),
        Some(EngineEvent::StreamOpened { request_id: 1 })
    ));
    assert!(events
        .iter()
        .any(|event| matches!(event, EngineEvent::Progress(_))));
}

#[tokio::test]
async fn relay_error_status_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("relay down"))
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let err = relay_for(&server)
        .generate(2, &site_request(), &sink)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn undecodable_relay_payload_is_a_stream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json at all", "text/plain"))
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let err = relay_for(&server)
        .generate(3, &site_request(), &sink)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Stream);
}
