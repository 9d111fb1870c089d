//! CodeCraft engine: model streaming, document extraction and export.
mod client;
mod engine;
mod extract;
mod filename;
mod phase;
mod prompt;
mod relay;
mod sse;
mod store;
mod types;

pub use client::{ClientSettings, Generator, OpenRouterClient, ProgressSink};
pub use engine::{BackendConfig, EngineConfig, EngineHandle};
pub use extract::{extract_document, ExtractError};
pub use filename::artifact_filename;
pub use phase::classify_progress;
pub use prompt::build_prompt;
pub use relay::{RelayClient, RelaySettings};
pub use sse::{decode_line, DeltaStream, SseRecord};
pub use store::{OutputDir, StoreError};
pub use types::{
    EngineEvent, FailureKind, GenError, GeneratedDocument, GenerationProgress, ProgressPhase,
    RequestId, SiteRequest, StyleChoice, Transcript,
};
