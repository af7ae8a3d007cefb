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

//! Typed configuration loaded from `~/chatmem/config.json`.
//!
//! Every field has a default, so a missing config file is not an error;
//! `chatmem init` writes a commented template for users who want to change
//! anything. The Gemini API key may also come from the environment.

mod schema;

pub use schema::{
    Config, GeminiConfig, MemoryConfig, OllamaConfig, ProvidersConfig, StoreConfig,
};
