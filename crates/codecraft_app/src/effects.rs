use std::path::PathBuf;

use chrono::Local;
use codecraft_core::{Effect, FailureCategory, FailureNotice, Msg};
use codecraft_engine::{
    artifact_filename, EngineEvent, EngineHandle, FailureKind, OutputDir, RequestId, SiteRequest,
};
use craft_logging::{craft_error, craft_info, craft_warn};

use crate::config::{save_settings, Settings};

/// Executes the effects the pure update function emits, and translates
/// engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    output: OutputDir,
    settings_path: PathBuf,
    settings: Settings,
    active_prompt: String,
    next_request_id: RequestId,
    active_request: Option<RequestId>,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        output: OutputDir,
        settings_path: PathBuf,
        settings: Settings,
    ) -> Self {
        Self {
            engine,
            output,
            settings_path,
            settings,
            active_prompt: String::new(),
            next_request_id: 0,
            active_request: None,
        }
    }

    /// Run each effect; synchronous effects produce follow-up messages
    /// immediately, the generation effect resolves later via `poll_event`.
    pub fn apply(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartGeneration { request } => {
                    self.next_request_id += 1;
                    let request_id = self.next_request_id;
                    self.active_request = Some(request_id);
                    self.active_prompt = request.prompt.clone();
                    craft_info!(
                        "Starting generation {} ({} prompt chars)",
                        request_id,
                        request.prompt.chars().count()
                    );
                    self.engine.generate(
                        request_id,
                        SiteRequest {
                            prompt: request.prompt,
                            style: map_style(request.style),
                        },
                    );
                }
                Effect::ExportDocument { document } => {
                    follow_ups.push(self.export(&document));
                }
                Effect::PersistTheme { dark_mode } => {
                    self.settings.dark_mode = dark_mode;
                    save_settings(&self.settings_path, &self.settings);
                }
                Effect::StoreCredential { api_key } => {
                    self.settings.api_key = Some(api_key);
                    save_settings(&self.settings_path, &self.settings);
                }
            }
        }
        follow_ups
    }

    /// Translate the next engine event, if any, into a core message.
    /// Events from abandoned requests are dropped.
    pub fn poll_event(&self) -> Option<Msg> {
        loop {
            let event = self.engine.try_recv()?;
            let msg = match event {
                EngineEvent::StreamOpened { request_id } => {
                    self.for_active(request_id, Msg::StreamOpened)
                }
                EngineEvent::Progress(progress) => self.for_active(
                    progress.request_id,
                    Msg::GenerationProgress {
                        phase: map_phase(progress.phase),
                        chars_received: progress.chars_received,
                    },
                ),
                EngineEvent::Extracting { request_id } => {
                    self.for_active(request_id, Msg::ExtractionStarted)
                }
                EngineEvent::Completed { request_id, result } => self.for_active(
                    request_id,
                    Msg::GenerationDone {
                        result: result.map(|document| document.html).map_err(|err| {
                            craft_warn!("Generation {} failed: {}", request_id, err);
                            FailureNotice {
                                category: map_failure(err.kind),
                                message: err.message,
                            }
                        }),
                    },
                ),
            };
            if msg.is_some() {
                return msg;
            }
        }
    }

    fn for_active(&self, request_id: RequestId, msg: Msg) -> Option<Msg> {
        if self.active_request == Some(request_id) {
            Some(msg)
        } else {
            craft_warn!("Dropping event from stale request {}", request_id);
            None
        }
    }

    fn export(&self, document: &str) -> Msg {
        let timestamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
        let filename = artifact_filename(&self.active_prompt, &timestamp);
        match self.output.write(&filename, document) {
            Ok(path) => {
                craft_info!("Wrote generated site to {:?}", path);
                Msg::ExportFinished {
                    path: Some(path.display().to_string()),
                }
            }
            Err(err) => {
                craft_error!("Failed to write generated site: {}", err);
                Msg::ExportFinished { path: None }
            }
        }
    }
}

fn map_style(style: codecraft_core::StyleChoice) -> codecraft_engine::StyleChoice {
    match style {
        codecraft_core::StyleChoice::NoCss => codecraft_engine::StyleChoice::NoCss,
        codecraft_core::StyleChoice::Simple => codecraft_engine::StyleChoice::Simple,
        codecraft_core::StyleChoice::Colorful => codecraft_engine::StyleChoice::Colorful,
    }
}

fn map_phase(phase: codecraft_engine::ProgressPhase) -> codecraft_core::ProgressPhase {
    match phase {
        codecraft_engine::ProgressPhase::Init => codecraft_core::ProgressPhase::Init,
        codecraft_engine::ProgressPhase::HtmlStructure => {
            codecraft_core::ProgressPhase::HtmlStructure
        }
        codecraft_engine::ProgressPhase::CssStyling => codecraft_core::ProgressPhase::CssStyling,
        codecraft_engine::ProgressPhase::ScriptLogic => codecraft_core::ProgressPhase::ScriptLogic,
        codecraft_engine::ProgressPhase::Complete => codecraft_core::ProgressPhase::Complete,
    }
}

fn map_failure(kind: FailureKind) -> FailureCategory {
    match kind {
        FailureKind::Network => FailureCategory::Network,
        FailureKind::Timeout => FailureCategory::Timeout,
        FailureKind::HttpStatus(_) => FailureCategory::Http,
        FailureKind::Auth => FailureCategory::Auth,
        FailureKind::RateLimit => FailureCategory::RateLimit,
        FailureKind::Stream => FailureCategory::Stream,
        FailureKind::EmptyDocument => FailureCategory::EmptyDocument,
        FailureKind::Cancelled => FailureCategory::Cancelled,
    }
}
