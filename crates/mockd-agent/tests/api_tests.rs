//! API integration tests for the session backend mock.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use mockd_agent::{AppState, create_router};

fn app() -> Router {
    create_router(AppState::new())
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(Method::GET)
        .body(Body::empty())
        .unwrap()
}

/// Create a session through the API and return its id.
async fn create_session(app: &Router, body: Value) -> String {
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/session", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app().oneshot(get_request("/global/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_then_get_returns_idle_session() {
    let app = app();
    let id = create_session(&app, json!({"title": "My Session"})).await;

    let response = app
        .clone()
        .oneshot(get_request(&format!("/session/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], id);
    assert_eq!(json["title"], "My Session");
    assert_eq!(json["status"], "idle");
    assert_eq!(json["path"]["cwd"], "/test");
    assert!(json["parentID"].is_null());
    assert!(json["time"]["created"].is_i64());

    // The message list exists and is empty from the same create call.
    let messages = app
        .oneshot(get_request(&format!("/session/{id}/message")))
        .await
        .unwrap();
    assert_eq!(body_json(messages).await, json!([]));
}

#[tokio::test]
async fn test_create_defaults_title() {
    let app = app();
    let id = create_session(&app, json!({})).await;

    let response = app
        .oneshot(get_request(&format!("/session/{id}")))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["title"], "New Session");
}

#[tokio::test]
async fn test_create_keeps_parent_reference() {
    let app = app();
    let parent = create_session(&app, json!({"title": "parent"})).await;
    let child = create_session(&app, json!({"title": "child", "parentID": parent})).await;

    let response = app
        .oneshot(get_request(&format!("/session/{child}")))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["parentID"], parent);
}

#[tokio::test]
async fn test_list_sessions_in_creation_order() {
    let app = app();
    let first = create_session(&app, json!({"title": "first"})).await;
    let second = create_session(&app, json!({"title": "second"})).await;

    let response = app.oneshot(get_request("/session")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let listed = json.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], first);
    assert_eq!(listed[1]["id"], second);
}

#[tokio::test]
async fn test_get_nonexistent_session() {
    let response = app()
        .oneshot(get_request("/session/session-0-999"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Session not found");
}

#[tokio::test]
async fn test_update_title() {
    let app = app();
    let id = create_session(&app, json!({"title": "before"})).await;

    let response = app
        .oneshot(json_request(
            Method::PUT,
            &format!("/session/{id}"),
            json!({"title": "after"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "after");
    assert_eq!(json["status"], "idle");
}

#[tokio::test]
async fn test_archive_transition_is_one_way() {
    let app = app();
    let id = create_session(&app, json!({"title": "to archive"})).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/session/{id}"),
            json!({"time": {"archived": 1700000000000u64}}),
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["status"], "archived");
    assert_eq!(json["time"]["archived"], 1700000000000u64);

    // A later title-only update must not revert the status.
    let response = app
        .oneshot(json_request(
            Method::PUT,
            &format!("/session/{id}"),
            json!({"title": "renamed"}),
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["title"], "renamed");
    assert_eq!(json["status"], "archived");
}

#[tokio::test]
async fn test_update_nonexistent_session() {
    let response = app()
        .oneshot(json_request(
            Method::PUT,
            "/session/session-0-999",
            json!({"title": "ghost"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Session not found");
}

#[tokio::test]
async fn test_delete_removes_session_and_messages() {
    let app = app();
    let id = create_session(&app, json!({"title": "doomed"})).await;
    app.clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/session/{id}/message"),
            json!({"content": "hi"}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/session/{id}"))
                .method(Method::DELETE)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!(true));

    let response = app
        .oneshot(get_request(&format!("/session/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_of_unknown_id_still_succeeds() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/session/session-0-999")
                .method(Method::DELETE)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Intentional asymmetry with GET: delete never reports not-found.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!(true));
}

#[tokio::test]
async fn test_send_message_stores_pair_returns_user_message() {
    let app = app();
    let id = create_session(&app, json!({"title": "chat"})).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/session/{id}/message"),
            json!({"content": "hi"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let returned = body_json(response).await;
    assert_eq!(returned["role"], "user");
    assert_eq!(returned["sessionID"], id);
    assert_eq!(returned["parts"], json!([{"type": "text", "text": "hi"}]));

    let response = app
        .oneshot(get_request(&format!("/session/{id}/message")))
        .await
        .unwrap();
    let stored = body_json(response).await;
    let stored = stored.as_array().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0]["role"], "user");
    assert_eq!(stored[0]["parts"][0]["text"], "hi");
    assert_eq!(stored[1]["role"], "assistant");
    assert_eq!(stored[1]["parts"][0]["text"], "Mock response to: hi");
}

#[tokio::test]
async fn test_send_message_to_unknown_session() {
    let response = app()
        .oneshot(json_request(
            Method::POST,
            "/session/session-0-999/message",
            json!({"content": "hi"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Session not found");
}

#[tokio::test]
async fn test_messages_of_unknown_session_are_empty() {
    let response = app()
        .oneshot(get_request("/session/session-0-999/message"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_config_endpoint() {
    let response = app().oneshot(get_request("/config")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["provider"]["type"], "mock");
}

#[tokio::test]
async fn test_project_endpoint() {
    let response = app().oneshot(get_request("/project")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!([{"id": "proj-1", "name": "Test Project", "worktree": "/test"}])
    );
}

#[tokio::test]
async fn test_session_status_map() {
    let app = app();
    let idle = create_session(&app, json!({"title": "idle"})).await;
    let archived = create_session(&app, json!({"title": "archived"})).await;
    app.clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/session/{archived}"),
            json!({"time": {"archived": 1700000000000u64}}),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get_request("/sessionStatus")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json[idle.as_str()], "idle");
    assert_eq!(json[archived.as_str()], "archived");
}

#[tokio::test]
async fn test_unknown_path_echoes_path_in_404() {
    let response = app().oneshot(get_request("/no/such/route")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Not found");
    assert_eq!(json["path"], "/no/such/route");
}

#[tokio::test]
async fn test_unknown_method_also_gets_404() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/session")
                .method(Method::PATCH)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["path"], "/session");
}

#[tokio::test]
async fn test_malformed_body_hits_catch_all() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/session")
                .method(Method::POST)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{broken"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_responses_carry_cors_headers() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/global/health")
                .method(Method::GET)
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|h| h.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_preflight_allows_put_and_delete() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/session/some-id")
                .method(Method::OPTIONS)
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(allowed.contains("PUT"));
    assert!(allowed.contains("DELETE"));
}

#[tokio::test]
async fn test_error_responses_carry_cors_headers() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/session/session-0-999")
                .method(Method::GET)
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}

#[tokio::test]
async fn test_two_states_are_isolated() {
    let first = app();
    let second = app();

    create_session(&first, json!({"title": "only in first"})).await;

    let response = second.oneshot(get_request("/session")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}
