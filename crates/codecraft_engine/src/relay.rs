use std::time::Duration;

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use crate::client::{
    build_http_client, classify_http_failure, map_transport_error, Generator, ProgressSink,
};
use crate::phase::classify_progress;
use crate::prompt::build_prompt;
use crate::{
    EngineEvent, FailureKind, GenError, GenerationProgress, RequestId, SiteRequest, Transcript,
};

/// Settings for the self-hosted relay, which keeps the API credential
/// server-side and re-emits the result as raw text chunks.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/generate".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct RelayDocument {
    html: String,
}

/// Client for the relay endpoint: posts `{prompt}`, reassembles the chunked
/// response and JSON-decodes it into `{html}`.
#[derive(Debug, Clone)]
pub struct RelayClient {
    settings: RelaySettings,
}

impl RelayClient {
    pub fn new(settings: RelaySettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl Generator for RelayClient {
    async fn generate(
        &self,
        request_id: RequestId,
        request: &SiteRequest,
        sink: &dyn ProgressSink,
    ) -> Result<Transcript, GenError> {
        let prompt = build_prompt(request);
        let client = build_http_client(self.settings.connect_timeout, self.settings.request_timeout)?;

        let response = client
            .post(&self.settings.endpoint)
            .json(&RelayRequest { prompt: &prompt })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status.as_u16(), &detail));
        }

        sink.emit(EngineEvent::StreamOpened { request_id });

        let mut raw: Vec<u8> = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk =
                chunk.map_err(|err| GenError::new(FailureKind::Stream, err.to_string()))?;
            raw.extend_from_slice(&chunk);
            // The payload is a JSON object under assembly; the markup inside
            // it still carries the substrings the classifier looks for.
            let so_far = String::from_utf8_lossy(&raw);
            sink.emit(EngineEvent::Progress(GenerationProgress {
                request_id,
                phase: classify_progress(&so_far),
                chars_received: so_far.chars().count() as u64,
            }));
        }

        let document: RelayDocument = serde_json::from_slice(&raw)
            .map_err(|err| GenError::new(FailureKind::Stream, err.to_string()))?;
        let chars_received = document.html.chars().count() as u64;
        Ok(Transcript {
            text: document.html,
            chars_received,
        })
    }
}
