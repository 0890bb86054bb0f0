//! Request handlers for the chat completion mock.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::stream::streaming_response;
use crate::types::{
    AssistantMessage, ChatCompletionRequest, ChatCompletionResponse, Choice, Role, Usage,
};

/// Model id advertised by `/v1/models` and in synthetic descriptors.
pub const MOCK_MODEL_ID: &str = "mock-gpt-4";

/// Synthesized replies echo at most this many characters of the prompt.
pub const REPLY_PREVIEW_CHARS: usize = 100;

/// Health check.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Model listing: a single synthetic descriptor.
pub async fn list_models() -> Json<serde_json::Value> {
    Json(json!({
        "object": "list",
        "data": [{
            "id": MOCK_MODEL_ID,
            "object": "model",
            "created": Utc::now().timestamp(),
            "owned_by": "mock",
        }],
    }))
}

/// Chat completion endpoint: a single JSON object, or a paced SSE stream
/// when `stream` is set. Malformed bodies are rejected before any streaming
/// work begins.
pub async fn chat_completions(
    payload: Result<Json<ChatCompletionRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;

    if request.tools.is_some() || request.tool_choice.is_some() {
        debug!("ignoring tool fields on chat completion request");
    }

    let user_content = last_user_content(&request);
    let reply = synthesize_reply(user_content);

    if request.stream {
        return Ok(streaming_response(request.model, reply).into_response());
    }

    let usage = estimate_usage(user_content, &reply);
    let response = ChatCompletionResponse {
        id: generate_response_id(),
        object: "chat.completion",
        created: Utc::now().timestamp(),
        model: request.model,
        choices: vec![Choice {
            index: 0,
            message: AssistantMessage {
                role: "assistant",
                content: reply,
            },
            finish_reason: "stop",
        }],
        usage,
    };

    Ok(Json(response).into_response())
}

/// Fallback for unknown paths.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

/// Content of the most recent user-authored message.
fn last_user_content(request: &ChatCompletionRequest) -> &str {
    request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or("Hello")
}

/// Deterministic echo reply; the preview truncation is cosmetic, token
/// estimates use the full untruncated content.
pub(crate) fn synthesize_reply(user_content: &str) -> String {
    let preview: String = user_content.chars().take(REPLY_PREVIEW_CHARS).collect();
    let ellipsis = if user_content.chars().count() > REPLY_PREVIEW_CHARS {
        "..."
    } else {
        ""
    };
    format!("Mock response to: {preview}{ellipsis}")
}

/// Character-count heuristic: length / 4, unrounded.
fn estimate_usage(user_content: &str, reply: &str) -> Usage {
    let prompt_tokens = user_content.chars().count() as f64 / 4.0;
    let completion_tokens = reply.chars().count() as f64 / 4.0;
    Usage {
        prompt_tokens,
        completion_tokens,
        total_tokens: prompt_tokens + completion_tokens,
    }
}

/// Process-unique response id.
pub(crate) fn generate_response_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("mock-{}-{}", Utc::now().timestamp_millis(), &suffix[..7])
}
