#![deny(
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

//! Durable session persistence.
//!
//! [`RedisSessionStore`] keeps one JSON value per session and overwrites it
//! wholesale on every save, trading write amplification for crash
//! consistency: with atomic single-key writes a torn save leaves either the
//! old or the new full state. [`MemoryStore`] is the same contract over a
//! process-local map, for tests and throwaway sessions.

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisSessionStore;
