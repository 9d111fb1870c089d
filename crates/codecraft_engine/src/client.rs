use std::sync::mpsc;
use std::time::Duration;

use craft_logging::craft_debug;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use crate::phase::classify_progress;
use crate::prompt::build_prompt;
use crate::sse::DeltaStream;
use crate::{
    EngineEvent, FailureKind, GenError, GenerationProgress, RequestId, SiteRequest, Transcript,
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// `false` requests a single completion object instead of a stream.
    pub stream: bool,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Sent as `HTTP-Referer`; OpenRouter uses it for app attribution.
    pub referer: String,
    /// Sent as `X-Title`.
    pub app_title: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: String::new(),
            model: "deepseek/deepseek-chat-v3-0324:free".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            stream: true,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            referer: "http://localhost:3000".to_string(),
            app_title: "CodeCraft AI".to_string(),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Source of raw model output for one request. The engine extracts the
/// document from whatever transcript the generator returns.
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        request_id: RequestId,
        request: &SiteRequest,
        sink: &dyn ProgressSink,
    ) -> Result<Transcript, GenError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: String,
}

/// Client for the hosted chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    settings: ClientSettings,
}

impl OpenRouterClient {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    async fn read_stream(
        &self,
        request_id: RequestId,
        response: reqwest::Response,
        sink: &dyn ProgressSink,
    ) -> Result<Transcript, GenError> {
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other));
        let mut deltas = DeltaStream::new(body);

        let mut transcript = String::new();
        let mut chars_received: u64 = 0;
        while let Some(delta) = deltas.next_delta().await {
            let delta = delta?;
            chars_received += delta.chars().count() as u64;
            transcript.push_str(&delta);
            sink.emit(EngineEvent::Progress(GenerationProgress {
                request_id,
                phase: classify_progress(&transcript),
                chars_received,
            }));
        }
        craft_debug!(
            "Stream for request {} finished after {} chars",
            request_id,
            chars_received
        );

        Ok(Transcript {
            text: transcript,
            chars_received,
        })
    }
}

#[async_trait::async_trait]
impl Generator for OpenRouterClient {
    async fn generate(
        &self,
        request_id: RequestId,
        request: &SiteRequest,
        sink: &dyn ProgressSink,
    ) -> Result<Transcript, GenError> {
        let prompt = build_prompt(request);
        let client = build_http_client(self.settings.connect_timeout, self.settings.request_timeout)?;

        let body = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            stream: self.settings.stream,
        };

        let response = client
            .post(self.completions_url())
            .bearer_auth(&self.settings.api_key)
            .header("HTTP-Referer", &self.settings.referer)
            .header("X-Title", &self.settings.app_title)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status.as_u16(), &detail));
        }

        sink.emit(EngineEvent::StreamOpened { request_id });

        if self.settings.stream {
            self.read_stream(request_id, response, sink).await
        } else {
            let completion: ChatCompletion = response
                .json()
                .await
                .map_err(|err| GenError::new(FailureKind::Stream, err.to_string()))?;
            let text = completion
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .unwrap_or_default();
            let chars_received = text.chars().count() as u64;
            Ok(Transcript {
                text,
                chars_received,
            })
        }
    }
}

pub(crate) fn build_http_client(
    connect_timeout: Duration,
    request_timeout: Duration,
) -> Result<reqwest::Client, GenError> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .build()
        .map_err(|err| GenError::new(FailureKind::Network, err.to_string()))
}

pub(crate) fn map_transport_error(err: reqwest::Error) -> GenError {
    if err.is_timeout() {
        return GenError::new(FailureKind::Timeout, err.to_string());
    }
    GenError::new(FailureKind::Network, err.to_string())
}

/// Turn a non-success status into a categorized failure. 401/403 and 429
/// classify by code; otherwise the response body is sniffed, since some
/// providers tunnel auth and quota errors through other statuses.
pub(crate) fn classify_http_failure(status: u16, detail: &str) -> GenError {
    let kind = match status {
        401 | 403 => FailureKind::Auth,
        429 => FailureKind::RateLimit,
        _ => sniff_failure_kind(status, detail),
    };
    let message = if detail.trim().is_empty() {
        format!("http status {status}")
    } else {
        format!("http status {status}: {}", detail.trim())
    };
    GenError::new(kind, message)
}

fn sniff_failure_kind(status: u16, detail: &str) -> FailureKind {
    let lowered = detail.to_ascii_lowercase();
    if lowered.contains("rate limit") {
        FailureKind::RateLimit
    } else if lowered.contains("unauthorized")
        || lowered.contains("authentication")
        || lowered.contains("invalid api key")
        || lowered.contains("permission")
    {
        FailureKind::Auth
    } else {
        FailureKind::HttpStatus(status)
    }
}
