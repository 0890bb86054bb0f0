//! Router assembly.

use axum::http::Method;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the session backend router with permissive CORS and request
/// tracing. Unmatched paths and methods both land on the structured 404
/// fallback.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Router::new()
        .route("/global/health", get(handlers::health))
        .route(
            "/session",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/session/{id}",
            get(handlers::get_session)
                .put(handlers::update_session)
                .delete(handlers::delete_session),
        )
        .route(
            "/session/{id}/message",
            get(handlers::list_messages).post(handlers::send_message),
        )
        .route("/config", get(handlers::get_config))
        .route("/project", get(handlers::list_projects))
        .route("/sessionStatus", get(handlers::session_status))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
