//! Gemini API client and wire types.
//!
//! The loop only depends on the [`LlmClient`] trait, so tests can script
//! model responses without touching the network. [`GeminiClient`] is the
//! production implementation speaking the `generateContent` REST endpoint.

mod client;
mod types;

pub use client::{GeminiClient, LlmClient};
pub use types::{
    FunctionCall, FunctionDeclaration, FunctionResponse, Message, ModelResponse, Part, Role,
    TokenUsage,
};
