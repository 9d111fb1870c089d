use bytes::Bytes;
use craft_logging::craft_warn;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;

use crate::{FailureKind, GenError};

/// Upstream keep-alives and deltas are small; anything near this size is a
/// runaway record, not a token.
const MAX_LINE_BYTES: usize = 1024 * 1024;
const DONE_PAYLOAD: &str = "[DONE]";

/// One classified line of the event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseRecord {
    /// A content delta extracted from a `data:` record.
    Delta(String),
    /// The literal stream terminator.
    Done,
    /// Blank line, comment, empty delta, or an unparsable record.
    Ignored,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Classify a single line of the response body.
///
/// A malformed payload is logged and skipped; one bad record must not lose
/// the rest of the response.
pub fn decode_line(line: &str) -> SseRecord {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return SseRecord::Ignored;
    }
    let Some(payload) = trimmed.strip_prefix("data:") else {
        return SseRecord::Ignored;
    };
    let payload = payload.trim_start();
    if payload == DONE_PAYLOAD {
        return SseRecord::Done;
    }
    match serde_json::from_str::<ChatChunk>(payload) {
        Ok(chunk) => {
            let delta = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content)
                .unwrap_or_default();
            if delta.is_empty() {
                SseRecord::Ignored
            } else {
                SseRecord::Delta(delta)
            }
        }
        Err(err) => {
            craft_warn!("Skipping malformed stream record: {err}");
            SseRecord::Ignored
        }
    }
}

/// Lazy sequence of content deltas decoded from a live response body.
///
/// Framing is line-based and stateful: partial lines, including multi-byte
/// characters split across transport chunks, stay buffered until the line
/// completes, so decoding never tears a character.
pub struct DeltaStream<S> {
    frames: FramedRead<StreamReader<S, Bytes>, LinesCodec>,
    finished: bool,
}

impl<S> DeltaStream<S>
where
    S: Stream<Item = std::io::Result<Bytes>> + Unpin,
{
    pub fn new(body: S) -> Self {
        Self {
            frames: FramedRead::new(
                StreamReader::new(body),
                LinesCodec::new_with_max_length(MAX_LINE_BYTES),
            ),
            finished: false,
        }
    }

    /// Next content delta, or `None` once the terminator or EOF is reached.
    ///
    /// A transport or framing error ends the stream; it is not recoverable
    /// the way a single malformed record is.
    pub async fn next_delta(&mut self) -> Option<Result<String, GenError>> {
        if self.finished {
            return None;
        }
        while let Some(line) = self.frames.next().await {
            match line {
                Ok(line) => match decode_line(&line) {
                    SseRecord::Delta(delta) => return Some(Ok(delta)),
                    SseRecord::Done => {
                        self.finished = true;
                        return None;
                    }
                    SseRecord::Ignored => continue,
                },
                Err(err) => {
                    self.finished = true;
                    return Some(Err(map_framing_error(err)));
                }
            }
        }
        self.finished = true;
        None
    }
}

fn map_framing_error(err: LinesCodecError) -> GenError {
    match err {
        LinesCodecError::MaxLineLengthExceeded => {
            GenError::new(FailureKind::Stream, "stream record exceeds line limit")
        }
        LinesCodecError::Io(err) => GenError::new(FailureKind::Stream, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_line, SseRecord};

    #[test]
    fn content_delta_is_extracted() {
        let line = r#"data: {"choices":[{"delta":{"content":"<html>"}}]}"#;
        assert_eq!(decode_line(line), SseRecord::Delta("<html>".to_string()));
    }

    #[test]
    fn terminator_is_recognized() {
        assert_eq!(decode_line("data: [DONE]"), SseRecord::Done);
    }

    #[test]
    fn blank_and_foreign_lines_are_ignored() {
        assert_eq!(decode_line(""), SseRecord::Ignored);
        assert_eq!(decode_line("   "), SseRecord::Ignored);
        assert_eq!(decode_line(": keep-alive"), SseRecord::Ignored);
    }

    #[test]
    fn malformed_payload_is_swallowed() {
        assert_eq!(decode_line("data: {not json"), SseRecord::Ignored);
    }

    #[test]
    fn empty_delta_is_ignored() {
        let line = r#"data: {"choices":[{"delta":{}}]}"#;
        assert_eq!(decode_line(line), SseRecord::Ignored);
        let line = r#"data: {"choices":[{"delta":{"content":""}}]}"#;
        assert_eq!(decode_line(line), SseRecord::Ignored);
    }
}
