//! Model provider implementations.
//!
//! One implementation covers nearly everything: most hosted LLM services
//! expose an OpenAI-compatible `/chat/completions` endpoint.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
