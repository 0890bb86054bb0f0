//! Request handlers for the session backend mock.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{
    CreateSessionRequest, Message, ProjectInfo, SendMessageRequest, Session, SessionStatus,
    UpdateSessionRequest,
};

/// Health check.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// List all sessions in creation order.
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<Session>> {
    Json(state.store.list_sessions().await)
}

/// Create a session.
pub async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let Json(request) = payload.map_err(bad_body)?;
    let session = state.store.create_session(request).await;
    info!(session_id = %session.id, "created session");
    Ok((StatusCode::CREATED, Json(session)))
}

/// Fetch one session.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .store
        .get_session(&id)
        .await
        .ok_or(ApiError::SessionNotFound)?;
    Ok(Json(session))
}

/// Update title and/or archival timestamp. Not-found is reported before the
/// body is parsed, as on GET.
pub async fn update_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSessionRequest>, JsonRejection>,
) -> Result<Json<Session>, ApiError> {
    if state.store.get_session(&id).await.is_none() {
        return Err(ApiError::SessionNotFound);
    }

    let Json(request) = payload.map_err(bad_body)?;
    let session = state
        .store
        .update_session(&id, request)
        .await
        .ok_or(ApiError::SessionNotFound)?;
    Ok(Json(session))
}

/// Delete a session and its messages. Always reports success, even for ids
/// that never existed.
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> Json<bool> {
    state.store.delete_session(&id).await;
    info!(session_id = %id, "deleted session");
    Json(true)
}

/// List a session's messages; unknown ids yield an empty list.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Vec<Message>> {
    Json(state.store.list_messages(&id).await)
}

/// Append a user message and a synthesized assistant reply. Only the user
/// message comes back; the reply shows up on the next list.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let Json(request) = payload.map_err(bad_body)?;
    let content = request.content.unwrap_or_default();
    let message = state
        .store
        .append_message(&id, &content)
        .await
        .ok_or(ApiError::SessionNotFound)?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Static provider configuration.
pub async fn get_config() -> Json<serde_json::Value> {
    Json(json!({ "provider": { "type": "mock" } }))
}

/// Static project listing.
pub async fn list_projects() -> Json<Vec<ProjectInfo>> {
    Json(vec![ProjectInfo {
        id: "proj-1",
        name: "Test Project",
        worktree: "/test",
    }])
}

/// Status by session id.
pub async fn session_status(
    State(state): State<AppState>,
) -> Json<HashMap<String, SessionStatus>> {
    Json(state.store.status_map().await)
}

/// Fallback for unmatched paths and methods: structured 404 echoing the
/// requested path.
pub async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found", "path": uri.path() })),
    )
        .into_response()
}

/// Body parse/read failures surface through the catch-all 500 arm.
fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::Internal(rejection.body_text())
}
