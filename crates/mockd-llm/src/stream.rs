//! Timed SSE emitter for streamed completions.
//!
//! The whole frame sequence is computed up front as `(offset, payload)`
//! pairs and replayed against a single timer origin. Absolute offsets from
//! one origin keep delivery order identical to schedule order even when an
//! individual sleep fires late.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, Sse};
use chrono::Utc;
use tokio_stream::StreamExt;
use tracing::warn;

use crate::handlers::generate_response_id;
use crate::types::{ChatCompletionChunk, ChunkChoice, Delta};

/// Gap between consecutive word frames.
const WORD_INTERVAL: Duration = Duration::from_millis(50);

/// Extra delay between the last word slot and the stop frame.
const STOP_LAG: Duration = Duration::from_millis(100);

/// End-of-stream sentinel payload.
const DONE_SENTINEL: &str = "[DONE]";

/// One SSE frame, scheduled `offset` after stream start.
pub(crate) struct ScheduledFrame {
    pub(crate) offset: Duration,
    pub(crate) payload: String,
}

/// Streamed completion response following the fixed schedule: role frame at
/// once, one frame per word every 50ms, stop frame 100ms after the last
/// word slot, then the `[DONE]` sentinel.
pub fn streaming_response(
    model: String,
    reply: String,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let frames = build_schedule(&model, &reply);
    let origin = tokio::time::Instant::now();

    let stream = tokio_stream::iter(frames).then(move |frame| async move {
        tokio::time::sleep_until(origin + frame.offset).await;
        Ok(Event::default().data(frame.payload))
    });

    // No keep-alive: the schedule is short and finite, and comment frames
    // would change the observable frame sequence.
    Sse::new(stream)
}

/// Build the full frame schedule for one reply. All chunks share a single
/// response id and creation timestamp.
pub(crate) fn build_schedule(model: &str, reply: &str) -> Vec<ScheduledFrame> {
    let id = generate_response_id();
    let created = Utc::now().timestamp();

    let chunk = |delta: Delta, finish_reason: Option<&'static str>| ChatCompletionChunk {
        id: id.clone(),
        object: "chat.completion.chunk",
        created,
        model: model.to_string(),
        choices: vec![ChunkChoice {
            index: 0,
            delta,
            finish_reason,
        }],
    };

    let words: Vec<&str> = reply.split(' ').collect();
    let mut frames = Vec::with_capacity(words.len() + 3);

    frames.push(ScheduledFrame {
        offset: Duration::ZERO,
        payload: serialize(&chunk(
            Delta {
                role: Some("assistant"),
                content: None,
            },
            None,
        )),
    });

    for (i, word) in words.iter().enumerate() {
        frames.push(ScheduledFrame {
            offset: WORD_INTERVAL * i as u32,
            payload: serialize(&chunk(
                Delta {
                    role: None,
                    content: Some(format!("{word} ")),
                },
                None,
            )),
        });
    }

    let stop_offset = WORD_INTERVAL * words.len() as u32 + STOP_LAG;
    frames.push(ScheduledFrame {
        offset: stop_offset,
        payload: serialize(&chunk(Delta::default(), Some("stop"))),
    });
    frames.push(ScheduledFrame {
        offset: stop_offset,
        payload: DONE_SENTINEL.to_string(),
    });

    frames
}

fn serialize(chunk: &ChatCompletionChunk) -> String {
    match serde_json::to_string(chunk) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("failed to serialize completion chunk: {err}");
            "{}".to_string()
        }
    }
}
