use std::sync::{mpsc, Arc};
use std::thread;

use crate::client::{ChannelProgressSink, ClientSettings, Generator, OpenRouterClient, ProgressSink};
use crate::extract::extract_document;
use crate::relay::{RelayClient, RelaySettings};
use crate::{
    EngineEvent, FailureKind, GenError, GeneratedDocument, GenerationProgress, ProgressPhase,
    RequestId, SiteRequest,
};

/// Which backend produces the model output.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    OpenRouter(ClientSettings),
    Relay(RelaySettings),
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub backend: BackendConfig,
}

enum EngineCommand {
    Generate {
        request_id: RequestId,
        request: SiteRequest,
    },
}

/// Bridge between a synchronous front-end and the async pipeline: commands
/// in over one channel, events polled out over another. Dropping the handle
/// abandons any in-flight request; cleanup of the underlying connection is
/// best-effort only.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let generator: Arc<dyn Generator> = match config.backend {
            BackendConfig::OpenRouter(settings) => Arc::new(OpenRouterClient::new(settings)),
            BackendConfig::Relay(settings) => Arc::new(RelayClient::new(settings)),
        };

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let generator = generator.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(generator.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn generate(&self, request_id: RequestId, request: SiteRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Generate {
            request_id,
            request,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    generator: &dyn Generator,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Generate {
            request_id,
            request,
        } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = run_pipeline(generator, request_id, &request, &sink).await;
            let _ = event_tx.send(EngineEvent::Completed { request_id, result });
        }
    }
}

async fn run_pipeline(
    generator: &dyn Generator,
    request_id: RequestId,
    request: &SiteRequest,
    sink: &dyn ProgressSink,
) -> Result<GeneratedDocument, GenError> {
    let transcript = generator.generate(request_id, request, sink).await?;
    sink.emit(EngineEvent::Extracting { request_id });
    let html = extract_document(&transcript.text, &request.prompt)
        .map_err(|err| GenError::new(FailureKind::EmptyDocument, err.to_string()))?;
    sink.emit(EngineEvent::Progress(GenerationProgress {
        request_id,
        phase: ProgressPhase::Complete,
        chars_received: transcript.chars_received,
    }));
    Ok(GeneratedDocument {
        html,
        chars_streamed: transcript.chars_received,
    })
}
