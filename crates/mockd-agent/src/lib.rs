//! Session backend mock.
//!
//! In-memory CRUD over sessions and their message lists plus a handful of
//! static read-only endpoints, matching the REST surface a client's session
//! layer talks to during integration tests. State lives for the process
//! lifetime only; nothing is persisted.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod store;
pub mod types;

pub use routes::create_router;
pub use state::AppState;
