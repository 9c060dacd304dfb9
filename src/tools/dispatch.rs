//! Turns a model's tool call into a tool response message.

use tracing::debug;

use super::{ToolDefinition, ToolRegistry, ToolResult};
use crate::message::{Message, ToolCall};
use crate::output::Renderer;

/// The outcome of one dispatched tool call, keyed by the call it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResponse {
    pub call_id: String,
    pub name: String,
    pub result: ToolResult,
}

impl ToolResponse {
    /// Whether this response belongs to `call`.
    pub fn answers(&self, call: &ToolCall) -> bool {
        self.call_id == call.id && self.name == call.name
    }

    /// Converts into the history turn fed back to the model.
    pub fn into_message(self) -> Message {
        Message::tool_result(self.call_id, self.result.content)
    }
}

/// The agent loop's view of the tool layer.
///
/// [`ToolRegistry`] is the production implementation; the seam exists so the
/// loop can be driven in isolation.
#[async_trait::async_trait(?Send)]
pub trait ToolExecutor {
    /// Catalogue sent to the model on every round trip.
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// Runs `call` and packages the outcome. Tool failures are folded into
    /// the result text rather than returned as errors.
    async fn dispatch(&self, call: &ToolCall, renderer: &mut dyn Renderer) -> ToolResponse;
}

#[async_trait::async_trait(?Send)]
impl ToolExecutor for ToolRegistry {
    fn definitions(&self) -> Vec<ToolDefinition> {
        ToolRegistry::definitions(self)
    }

    async fn dispatch(&self, call: &ToolCall, renderer: &mut dyn Renderer) -> ToolResponse {
        renderer.tool_call(&call.name, &call.arguments);
        debug!(tool = %call.name, id = %call.id, "dispatching tool call");

        let result = ToolResult::from(self.execute(&call.name, call.arguments.clone()).await);
        if result.is_error {
            debug!(tool = %call.name, error = %result.content, "tool call failed");
        }

        renderer.tool_result(&call.name, &result);
        ToolResponse {
            call_id: call.id.clone(),
            name: call.name.clone(),
            result,
        }
    }
}
