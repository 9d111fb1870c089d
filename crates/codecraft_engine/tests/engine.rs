use std::time::{Duration, Instant};

use codecraft_engine::{
    BackendConfig, ClientSettings, EngineConfig, EngineEvent, FailureKind, ProgressPhase,
    SiteRequest, StyleChoice,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_body(deltas: &[&str]) -> String {
    let mut body = String::new();
    for delta in deltas {
        body.push_str(&format!(
            "data: {}\n\n",
            json!({"choices": [{"delta": {"content": delta}}]})
        ));
    }
    body.push_str("data: [DONE]\n");
    body
}

fn engine_for(server: &MockServer) -> codecraft_engine::EngineHandle {
    let settings = ClientSettings {
        base_url: server.uri(),
        api_key: "sk-or-test".to_string(),
        ..ClientSettings::default()
    };
    codecraft_engine::EngineHandle::new(EngineConfig {
        backend: BackendConfig::OpenRouter(settings),
    })
}

async fn drain_until_completed(engine: &codecraft_engine::EngineHandle) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut events = Vec::new();
    loop {
        match engine.try_recv() {
            Some(event) => {
                let finished = matches!(event, EngineEvent::Completed { .. });
                events.push(event);
                if finished {
                    return events;
                }
            }
            None => {
                assert!(Instant::now() < deadline, "engine never completed");
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
    }
}

#[tokio::test]
async fn pipeline_streams_extracts_and_completes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sse_body(&[
                "Here you go! ",
                "<!DOCTYPE html><html><sty",
                "le>p{}</style><body>Hi</body></html>",
                " Enjoy!",
            ]),
            "text/event-stream",
        ))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.generate(
        1,
        SiteRequest {
            prompt: "a greeting".to_string(),
            style: StyleChoice::Simple,
        },
    );

    let events = drain_until_completed(&engine).await;

    assert!(matches!(
        events.first(),
        Some(EngineEvent::StreamOpened { request_id: 1 })
    ));
    assert!(events
        .iter()
        .any(|event| matches!(event, EngineEvent::Extracting { request_id: 1 })));

    let phases: Vec<ProgressPhase> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::Progress(progress) => Some(progress.phase),
            _ => None,
        })
        .collect();
    assert_eq!(phases.first(), Some(&ProgressPhase::Init));
    assert!(phases.contains(&ProgressPhase::CssStyling));

    match events.last() {
        Some(EngineEvent::Completed {
            request_id: 1,
            result: Ok(document),
        }) => {
            assert_eq!(
                document.html,
                "<!DOCTYPE html><html><style>p{}</style><body>Hi</body></html>"
            );
        }
        other => panic!("unexpected final event: {other:?}"),
    }
}

#[tokio::test]
async fn pipeline_reports_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.generate(
        2,
        SiteRequest {
            prompt: "anything".to_string(),
            style: StyleChoice::Simple,
        },
    );

    let events = drain_until_completed(&engine).await;
    match events.last() {
        Some(EngineEvent::Completed {
            request_id: 2,
            result: Err(err),
        }) => assert_eq!(err.kind, FailureKind::RateLimit),
        other => panic!("unexpected final event: {other:?}"),
    }
}

#[tokio::test]
async fn empty_stream_fails_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("data: [DONE]\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.generate(
        3,
        SiteRequest {
            prompt: "anything".to_string(),
            style: StyleChoice::Simple,
        },
    );

    let events = drain_until_completed(&engine).await;
    match events.last() {
        Some(EngineEvent::Completed {
            request_id: 3,
            result: Err(err),
        }) => assert_eq!(err.kind, FailureKind::EmptyDocument),
        other => panic!("unexpected final event: {other:?}"),
    }
}
