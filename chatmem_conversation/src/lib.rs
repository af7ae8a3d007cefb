#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Per-request conversation orchestration.
//!
//! [`ChatService`] runs the one linear pass every request takes:
//! fetch session → apply memory strategy → call the model → append the
//! reply → save. All durable state lives in the injected store, so the
//! service itself is stateless and requests against different sessions run
//! fully concurrently. Concurrent requests against the *same* session race
//! at the save and the last write wins — a documented policy, not a bug.

mod service;

pub use service::{ChatError, ChatReply, ChatRequest, ChatService};
