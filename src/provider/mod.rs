//! LLM provider abstraction for corral.
//!
//! The agent loop talks to the remote model only through [`ModelClient`].
//! [`Provider`] implements it over rig-core's provider clients with enum
//! dispatch, keeping provider-specific details out of the loop. Supports
//! Gemini, Anthropic, OpenAI, OpenRouter, and Ollama (local) via
//! [`ProviderKind`].

mod client;
mod kind;
mod model;
mod resolve;

pub use client::Provider;
pub use kind::ProviderKind;
pub use model::{ModelClient, ModelReply, ModelRequest, TokenUsage};
pub use resolve::{resolve_model, ModelSelection};
