//! Concrete completion backends.

/// OpenAI-compatible chat completions over HTTP
pub mod openai;

pub use openai::OpenAiBackend;
