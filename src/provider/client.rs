//! LLM provider client over rig-core.
//!
//! Contains the [`Provider`] struct which wraps rig-core provider clients
//! behind enum dispatch. Each round trip is one non-streaming completion
//! request; tool execution stays with corral's own agent loop.

use anyhow::{Context, Result};
use rig::client::CompletionClient;
use rig::completion::{CompletionModel, ToolDefinition as RigToolDefinition};
use rig::message::{
    AssistantContent, Message as RigMessage, Text, ToolCall as RigToolCall, ToolFunction,
    ToolResultContent, UserContent,
};
use rig::providers::{anthropic, gemini, openai, openrouter};
use rig::OneOrMany;
use std::collections::HashMap;
use tracing::debug;

use super::{ModelClient, ModelReply, ModelRequest, ModelSelection, ProviderKind, TokenUsage};
use crate::config::Config;
use crate::message::{Message, Role, ToolCall};
use crate::tools::ToolDefinition;

/// Internal enum wrapping provider-specific clients.
enum ClientKind {
    Gemini(gemini::Client),
    Anthropic(anthropic::Client),
    OpenAI(openai::Client),
    OpenRouter(openrouter::Client),
    Ollama(openai::Client),
}

/// A configured LLM provider ready to handle completion requests.
///
/// Wraps a rig-core provider client and the target model name. A fresh
/// completion model handle is built for each round trip since it is cheap.
pub struct Provider {
    client: ClientKind,
    model: String,
}

/// Dispatches an operation across provider-specific clients.
///
/// Matches on [`ClientKind`] and executes the same block for each variant,
/// letting the compiler monomorphize per provider.
macro_rules! dispatch {
    ($self:expr, |$client:ident| $body:expr) => {
        match &$self.client {
            ClientKind::Gemini($client) => $body,
            ClientKind::Anthropic($client) => $body,
            ClientKind::OpenAI($client) => $body,
            ClientKind::OpenRouter($client) => $body,
            ClientKind::Ollama($client) => $body,
        }
    };
}

impl Provider {
    /// Creates a new [`Provider`] from the loaded application config.
    ///
    /// Resolves the API key through corral's config precedence chain
    /// (env var → config file → substitution) and builds the appropriate
    /// provider client.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is found for the selected provider
    /// or if client construction fails.
    pub fn from_config(config: &Config, selection: &ModelSelection) -> Result<Self> {
        let client = match selection.provider {
            ProviderKind::Gemini => {
                let api_key = require_api_key(config, ProviderKind::Gemini)?;
                let client =
                    gemini::Client::new(&api_key).context("Failed to create Gemini client")?;
                ClientKind::Gemini(client)
            }
            ProviderKind::Anthropic => {
                let api_key = require_api_key(config, ProviderKind::Anthropic)?;
                let client = anthropic::Client::new(&api_key)
                    .context("Failed to create Anthropic client")?;
                ClientKind::Anthropic(client)
            }
            ProviderKind::OpenAI => {
                let api_key = require_api_key(config, ProviderKind::OpenAI)?;
                let client =
                    openai::Client::new(&api_key).context("Failed to create OpenAI client")?;
                ClientKind::OpenAI(client)
            }
            ProviderKind::OpenRouter => {
                let api_key = require_api_key(config, ProviderKind::OpenRouter)?;
                let client = openrouter::Client::new(&api_key)
                    .context("Failed to create OpenRouter client")?;
                ClientKind::OpenRouter(client)
            }
            ProviderKind::Ollama => {
                let base_url = config
                    .provider
                    .ollama
                    .as_ref()
                    .and_then(|o| o.base_url.as_deref())
                    .unwrap_or(crate::constants::OLLAMA_DEFAULT_BASE_URL);
                let client = openai::Client::builder()
                    .api_key("ollama")
                    .base_url(format!("{}/v1", base_url))
                    .build()
                    .context("Failed to create Ollama client")?;
                ClientKind::Ollama(client)
            }
        };

        Ok(Self {
            client,
            model: selection.model.clone(),
        })
    }
}

/// Looks up the API key for `kind`, failing with a hint on where to set it.
fn require_api_key(config: &Config, kind: ProviderKind) -> Result<String> {
    let name = kind.name();
    config.resolve_api_key(name).with_context(|| {
        format!(
            "No API key found for {name}. Set {}_API_KEY or configure it in {}",
            name.to_uppercase(),
            crate::constants::CONFIG_FILENAME
        )
    })
}

#[async_trait::async_trait(?Send)]
impl ModelClient for Provider {
    async fn complete(&self, request: ModelRequest<'_>) -> Result<ModelReply> {
        let mut chat_history = to_rig_messages(request.history);
        // The newest turn (user prompt or tool results) is sent as the prompt.
        let prompt = chat_history
            .pop()
            .context("Cannot send an empty conversation to the model")?;
        let tools: Vec<RigToolDefinition> = request.tools.iter().map(to_rig_definition).collect();

        debug!(
            model = %self.model,
            history = chat_history.len(),
            tools = tools.len(),
            "sending completion request"
        );

        let (choice, usage) = dispatch!(self, |client| {
            let response = client
                .completion_model(&self.model)
                .completion_request(prompt.clone())
                .preamble(request.system.to_string())
                .messages(chat_history.clone())
                .tools(tools.clone())
                .max_tokens(crate::constants::MAX_TOKENS)
                .send()
                .await
                .context("LLM API call failed")?;
            (response.choice, response.usage)
        });

        Ok(ModelReply {
            message: from_rig_choice(choice),
            usage: Some(TokenUsage {
                input_tokens: usage.input_tokens,
                output_tokens: usage.output_tokens,
            }),
        })
    }
}

fn to_rig_definition(def: &ToolDefinition) -> RigToolDefinition {
    RigToolDefinition {
        name: def.name.clone(),
        description: def.description.clone(),
        parameters: def.parameters.clone(),
    }
}

/// Converts corral's history into rig-core messages.
///
/// - **User** → `RigMessage::User` with text content
/// - **Assistant** → `RigMessage::Assistant` with text and `ToolCall` items
/// - **Tool** → consecutive results are grouped into one `RigMessage::User`
///   carrying `ToolResult` items, so every call of a round is answered in a
///   single turn
///
/// A tool result carries the provider `call_id` of the call it answers.
fn to_rig_messages(history: &[Message]) -> Vec<RigMessage> {
    let mut out = Vec::with_capacity(history.len());
    let mut results: Vec<UserContent> = Vec::new();
    let mut call_ids: HashMap<&str, &str> = HashMap::new();

    for msg in history {
        match msg.role {
            Role::Tool => {
                let id = msg.tool_call_id.clone().unwrap_or_default();
                let content = OneOrMany::one(ToolResultContent::text(msg.text()));
                let result = match call_ids.get(id.as_str()) {
                    Some(call_id) => {
                        UserContent::tool_result_with_call_id(id, call_id.to_string(), content)
                    }
                    None => UserContent::tool_result(id, content),
                };
                results.push(result);
            }
            Role::User => {
                flush_results(&mut out, &mut results);
                out.push(RigMessage::user(msg.text()));
            }
            Role::Assistant => {
                flush_results(&mut out, &mut results);
                for tc in &msg.tool_calls {
                    if let Some(call_id) = tc.call_id.as_deref() {
                        call_ids.insert(tc.id.as_str(), call_id);
                    }
                }
                out.push(assistant_to_rig(msg));
            }
        }
    }
    flush_results(&mut out, &mut results);
    out
}

fn flush_results(out: &mut Vec<RigMessage>, results: &mut Vec<UserContent>) {
    if let Ok(content) = OneOrMany::many(std::mem::take(results)) {
        out.push(RigMessage::User { content });
    }
}

fn assistant_to_rig(msg: &Message) -> RigMessage {
    if msg.tool_calls.is_empty() {
        return RigMessage::assistant(msg.text());
    }
    let mut items: Vec<AssistantContent> = Vec::new();
    if !msg.text().is_empty() {
        items.push(AssistantContent::Text(Text {
            text: msg.text().to_string(),
        }));
    }
    for tc in &msg.tool_calls {
        let mut call = RigToolCall::new(
            tc.id.clone(),
            ToolFunction::new(tc.name.clone(), tc.arguments.clone()),
        )
        .with_signature(tc.signature.clone());
        if let Some(call_id) = &tc.call_id {
            call = call.with_call_id(call_id.clone());
        }
        items.push(AssistantContent::ToolCall(call));
    }
    RigMessage::Assistant {
        id: None,
        content: OneOrMany::many(items)
            .unwrap_or_else(|_| OneOrMany::one(AssistantContent::text(""))),
    }
}

/// Flattens a completion choice into one assistant [`Message`].
///
/// Text parts are concatenated; tool calls keep the order the model gave
/// them. Reasoning and other content kinds are dropped.
fn from_rig_choice(choice: OneOrMany<AssistantContent>) -> Message {
    let mut text = String::new();
    let mut calls = Vec::new();
    for item in choice {
        match item {
            AssistantContent::Text(Text { text: part }) => text.push_str(&part),
            AssistantContent::ToolCall(tc) => calls.push(ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
                call_id: tc.call_id,
                signature: tc.signature,
            }),
            _ => {}
        }
    }
    Message::assistant_with_calls(text, calls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(id: &str, name: &str) -> ToolCall {
        ToolCall::new(id, name, json!({}))
    }

    #[test]
    fn test_tool_results_are_grouped_into_one_turn() {
        let history = vec![
            Message::user("run the tests"),
            Message::assistant_with_calls(
                "",
                vec![call("a", "get_files_info"), call("b", "run_python_file")],
            ),
            Message::tool_result("a", "- tests.py"),
            Message::tool_result("b", "STDOUT:\nok"),
        ];
        let converted = to_rig_messages(&history);
        assert_eq!(converted.len(), 3);
        match &converted[2] {
            RigMessage::User { content, .. } => assert_eq!(content.len(), 2),
            other => panic!("expected grouped tool results, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_turns_map_one_to_one() {
        let history = vec![Message::user("hi"), Message::assistant("hello")];
        assert_eq!(to_rig_messages(&history).len(), 2);
    }

    #[test]
    fn test_choice_keeps_text_and_call_order() {
        let choice = OneOrMany::many(vec![
            AssistantContent::text("Let me look. "),
            AssistantContent::ToolCall(RigToolCall::new(
                "1".into(),
                ToolFunction::new("get_files_info".into(), json!({"directory": "pkg"})),
            )),
            AssistantContent::ToolCall(RigToolCall::new(
                "2".into(),
                ToolFunction::new("get_file_content".into(), json!({"file_path": "main.py"})),
            )),
        ])
        .unwrap();
        let message = from_rig_choice(choice);
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.text(), "Let me look. ");
        let names: Vec<&str> = message.tool_calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["get_files_info", "get_file_content"]);
        assert_eq!(message.tool_calls[0].arguments, json!({"directory": "pkg"}));
    }

    #[test]
    fn test_call_id_survives_round_trip_for_responses_api() {
        let choice = OneOrMany::one(AssistantContent::tool_call_with_call_id(
            "fc_1",
            "call_abc".to_string(),
            "get_files_info",
            json!({"directory": "pkg"}),
        ));
        let assistant = from_rig_choice(choice);
        assert_eq!(assistant.tool_calls[0].call_id.as_deref(), Some("call_abc"));

        let history = vec![
            Message::user("list files in pkg"),
            assistant,
            Message::tool_result("fc_1", "- calculator.py"),
        ];
        let converted = to_rig_messages(&history);

        match &converted[1] {
            RigMessage::Assistant { content, .. } => match content.first() {
                AssistantContent::ToolCall(tc) => {
                    assert_eq!(tc.id, "fc_1");
                    assert_eq!(tc.call_id.as_deref(), Some("call_abc"));
                }
                other => panic!("expected tool call, got {other:?}"),
            },
            other => panic!("expected assistant turn, got {other:?}"),
        }
        match converted[2].clone() {
            RigMessage::User { content } => match content.first() {
                UserContent::ToolResult(result) => {
                    assert_eq!(result.call_id.as_deref(), Some("call_abc"))
                }
                other => panic!("expected tool result, got {other:?}"),
            },
            other => panic!("expected tool results, got {other:?}"),
        }

        for msg in converted {
            let items: Result<Vec<openai::responses_api::InputItem>, _> = msg.try_into();
            assert!(items.is_ok(), "{items:?}");
        }
    }

    #[test]
    fn test_signature_is_sent_back() {
        let mut tc = call("get_files_info", "get_files_info");
        tc.signature = Some("sig".into());
        let history = vec![
            Message::user("hi"),
            Message::assistant_with_calls("", vec![tc]),
            Message::tool_result("get_files_info", "- a.py"),
        ];
        match &to_rig_messages(&history)[1] {
            RigMessage::Assistant { content, .. } => match content.first() {
                AssistantContent::ToolCall(tc) => {
                    assert_eq!(tc.signature.as_deref(), Some("sig"));
                    assert!(tc.call_id.is_none());
                }
                other => panic!("expected tool call, got {other:?}"),
            },
            other => panic!("expected assistant turn, got {other:?}"),
        }
    }
}
