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

//! Memory strategies for bounded conversation history.
//!
//! Before each model call the orchestrator asks a [`MemoryStrategy`] which
//! subset or summary of the session's history to actually send. Three
//! policies exist:
//!
//! - `None`: the full history, unbounded growth accepted.
//! - `SlidingWindow`: the trailing N messages, no compression.
//! - `RollingSummary`: once history outgrows a threshold, older turns are
//!   condensed by the [`Summarizer`] into a running digest and evicted from
//!   storage.
//!
//! The strategy is a tagged variant, not a trait object: it is really a
//! three-way policy switch, and the only external capability it needs (the
//! summarizer) is passed in explicitly so selection stays testable without
//! a live model.

mod managed;
mod strategy;
mod summarizer;

pub use managed::ManagedHistory;
pub use strategy::{MemoryChoice, MemoryStrategy};
pub use summarizer::Summarizer;
