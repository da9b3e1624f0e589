//! Gemini judgment provider
//!
//! The judgment capability is a generative reasoning service constrained to
//! a closed structured-output contract. The client handles transport; the
//! judgment module owns the instruction block, the response schema, and the
//! defensive validation of every reply.

pub mod client;
pub mod judgment;
pub mod types;

pub use client::GeminiClient;
pub use judgment::GeminiJudgmentProvider;
