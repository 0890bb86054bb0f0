//! OpenAI-compatible chat completion mock.
//!
//! Deterministic stand-in for a chat completion API used to exercise a
//! client's network layer: no inference, just echo-style replies derived
//! from the latest user message, returned either as a single JSON object or
//! as a paced SSE stream imitating token-by-token generation.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod stream;
pub mod types;

pub use routes::create_router;
