//! HTTP provider implementations
//!
//! One module per consumed capability:
//! - `translator`: text normalization/translation service
//! - `classifier`: remote ML classification service
//! - `gemini`: structured-output judgment via the Gemini API

pub mod classifier;
pub mod gemini;
pub mod translator;
