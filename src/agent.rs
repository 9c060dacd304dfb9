//! The tool-augmented interaction loop.
//!
//! [`AgentLoop`] drives an explicit state machine: ask the model for the next
//! step, run any tool calls it requests through the [`ToolExecutor`], append
//! everything to the [`Conversation`], and repeat until the model answers in
//! plain text or the round-trip ceiling is reached. The two suspension points
//! are the model request and tool execution; both are awaited to completion
//! before the loop moves on, and tool calls run one at a time in the order
//! requested.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::message::{Conversation, ToolCall};
use crate::output::Renderer;
use crate::provider::{ModelClient, ModelRequest, TokenUsage};
use crate::tools::ToolExecutor;

/// Where the loop currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentState {
    /// Next step is a model round trip.
    AwaitingModel,
    /// The model asked for these calls, in this order.
    ExecutingTools(Vec<ToolCall>),
    /// The model produced its final answer.
    Done(String),
}

/// Counts model round trips that ended in tool calls.
#[derive(Debug, Clone, Copy)]
pub struct CallCounter {
    count: usize,
    ceiling: usize,
}

impl CallCounter {
    pub fn new(ceiling: usize) -> Self {
        Self { count: 0, ceiling }
    }

    pub fn increment(&mut self) {
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn exhausted(&self) -> bool {
        self.count >= self.ceiling
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The model's final text answer.
    Answered(String),
    /// The ceiling was reached before the model stopped calling tools.
    BudgetExhausted,
}

/// Result of [`AgentLoop::run`].
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: Outcome,
    /// Model requests made during the run.
    pub round_trips: usize,
    /// Token usage summed over every reply that reported it.
    pub usage: TokenUsage,
}

/// One run's worth of wiring: the model, the tools, and fixed settings.
pub struct AgentLoop<'a> {
    model: &'a dyn ModelClient,
    tools: &'a dyn ToolExecutor,
    system_prompt: &'a str,
    max_calls: usize,
}

impl<'a> AgentLoop<'a> {
    pub fn new(
        model: &'a dyn ModelClient,
        tools: &'a dyn ToolExecutor,
        system_prompt: &'a str,
        max_calls: usize,
    ) -> Self {
        Self {
            model,
            tools,
            system_prompt,
            max_calls,
        }
    }

    /// Runs until the model answers or the call ceiling is reached.
    ///
    /// Every model turn and tool response is appended to `conversation`.
    /// The final answer, if any, is handed to `renderer`.
    ///
    /// # Errors
    ///
    /// Fails if a model request fails (no retry is attempted) or if a tool
    /// call is left without a matching response.
    pub async fn run(
        &self,
        conversation: &mut Conversation,
        renderer: &mut dyn Renderer,
    ) -> Result<RunReport> {
        let definitions = self.tools.definitions();
        let mut counter = CallCounter::new(self.max_calls);
        let mut round_trips = 0;
        let mut usage = TokenUsage::default();
        let mut state = AgentState::AwaitingModel;

        loop {
            state = match state {
                AgentState::AwaitingModel => {
                    if counter.exhausted() {
                        warn!(
                            tool_rounds = counter.count(),
                            "model call ceiling reached without a final answer"
                        );
                        renderer.budget_exhausted(round_trips);
                        return Ok(RunReport {
                            outcome: Outcome::BudgetExhausted,
                            round_trips,
                            usage,
                        });
                    }

                    round_trips += 1;
                    debug!(
                        round_trip = round_trips,
                        history = conversation.messages().len(),
                        "awaiting model"
                    );
                    let request = ModelRequest {
                        system: self.system_prompt,
                        history: conversation.messages(),
                        tools: &definitions,
                    };
                    let reply = self
                        .model
                        .complete(request)
                        .await
                        .with_context(|| format!("Model request failed on round trip {round_trips}"))?;
                    if let Some(reply_usage) = reply.usage {
                        usage += reply_usage;
                    }

                    let calls = reply.message.tool_calls.clone();
                    let text = reply.message.text().to_string();
                    conversation.push(reply.message);

                    if calls.is_empty() {
                        AgentState::Done(text)
                    } else {
                        AgentState::ExecutingTools(calls)
                    }
                }
                AgentState::ExecutingTools(calls) => {
                    for call in &calls {
                        let response = self.tools.dispatch(call, renderer).await;
                        if !response.answers(call) {
                            return Err(AgentError::MissingToolResponse {
                                name: call.name.clone(),
                                id: call.id.clone(),
                            }
                            .into());
                        }
                        conversation.push(response.into_message());
                    }
                    counter.increment();
                    AgentState::AwaitingModel
                }
                AgentState::Done(text) => {
                    renderer.answer(&text);
                    return Ok(RunReport {
                        outcome: Outcome::Answered(text),
                        round_trips,
                        usage,
                    });
                }
            };
        }
    }
}
