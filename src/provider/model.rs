//! The seam between the agent loop and a remote model.

use anyhow::Result;

use crate::message::Message;
use crate::tools::ToolDefinition;

/// Everything the model sees on one round trip.
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    /// Fixed system instruction.
    pub system: &'a str,
    /// Full conversation so far, oldest first.
    pub history: &'a [Message],
    /// Tool catalogue the model may call into.
    pub tools: &'a [ToolDefinition],
}

/// Token counts reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl std::ops::AddAssign for TokenUsage {
    fn add_assign(&mut self, other: Self) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// One model turn: free text, tool-call requests, or both.
#[derive(Debug, Clone)]
pub struct ModelReply {
    /// Assistant message to append to history. Its `tool_calls` are in the
    /// order the model requested them.
    pub message: Message,
    pub usage: Option<TokenUsage>,
}

/// A remote model that can take one conversational step.
#[async_trait::async_trait(?Send)]
pub trait ModelClient {
    /// Sends the request and waits for the complete reply.
    ///
    /// # Errors
    ///
    /// Returns an error on transport, authentication, or decoding failure.
    async fn complete(&self, request: ModelRequest<'_>) -> Result<ModelReply>;
}
