//! Context assembly for model prompts.
//!
//! The compressor renders raw operational context into a prose string at
//! one of three detail levels (derived from the permitted model tier), so
//! the prompt shrinks as the budget tightens without switching data
//! sources. `estimate_tokens` sizes the assembled output with a cheap
//! character heuristic; no tokenizer is involved.

pub mod compressor;
pub mod token;

pub use compressor::{assemble, assemble_at, FocusDomain};
pub use token::estimate_tokens;
