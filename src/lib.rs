//! Natural-language task chat engine.
//!
//! Turns free-form text into one of five canonical task operations through
//! a deterministic precedence grammar, optionally refined by an external
//! LLM oracle, and executes them against an in-memory task store.

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod format;
pub mod oracle;
pub mod router;
pub mod store;
pub mod types;
pub mod validate;
