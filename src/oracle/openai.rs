use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    error::oracle_error::OracleError,
    input::Screenshot,
    message::{Message, Role, ToolCall},
    oracle::{Oracle, OutputSchema},
    shared::config::OracleConfig,
    tools::ToolInfo,
    utils::string_util::{StripCodeBlock, extract_json_object},
};

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiOracle {
    client: Client,
    config: OracleConfig,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Deserialize)]
struct ResponseToolCall {
    id: String,
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

impl OpenAiOracle {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    async fn complete(&self, body: &ChatCompletionRequest<'_>) -> Result<ResponseMessage, OracleError> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );
        debug!(model = body.model, messages = body.messages.len(), "oracle request");

        let mut request = self.client.post(&url).json(body);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            return Err(OracleError::from_status(status.as_u16(), text));
        }

        let response: ChatCompletionResponse = response.json().await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| OracleError::InvalidResponse("response has no choices".into()))
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    async fn chat(&self, messages: &[Message], tools: &[ToolInfo]) -> Result<Message, OracleError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: encode_messages(messages),
            tools: tools.iter().map(encode_tool).collect(),
            response_format: None,
        };
        let reply = self.complete(&body).await?;

        let tool_calls = reply
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                let arguments = parse_arguments(&call.function.arguments);
                ToolCall::new(call.id, call.function.name, arguments)
            })
            .collect();
        Ok(Message::assistant(reply.content.unwrap_or_default(), tool_calls))
    }

    async fn structured(&self, messages: &[Message], schema: &OutputSchema) -> Result<Value, OracleError> {
        let mut request = vec![Message::system(format!(
            "Respond with a single JSON object named `{}` that matches this JSON schema, and nothing else:\n{}",
            schema.name, schema.schema
        ))];
        request.extend(messages.iter().cloned());

        let body = ChatCompletionRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: encode_messages(&request),
            tools: Vec::new(),
            response_format: Some(json!({ "type": "json_object" })),
        };
        let reply = self.complete(&body).await?;
        let content = reply
            .content
            .ok_or_else(|| OracleError::InvalidResponse("structured reply has no content".into()))?;

        let stripped = content.strip_code_block();
        let json = extract_json_object(stripped).unwrap_or(stripped);
        serde_json::from_str(json).map_err(|e| OracleError::InvalidResponse(format!("{e}: {content}")))
    }
}

fn parse_arguments(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return json!({});
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn encode_tool(tool: &ToolInfo) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.params_schema,
        }
    })
}

fn image_part(image: &Screenshot) -> Value {
    json!({ "type": "image_url", "image_url": { "url": image.data_url() } })
}

/// Tool messages can only carry text, so their screenshots are re-delivered
/// in one user message right after the tool-message group. This keeps the
/// newest screenshot the last image in context.
fn encode_messages(messages: &[Message]) -> Vec<Value> {
    let mut encoded = Vec::with_capacity(messages.len());
    let mut pending: Vec<(&str, &Screenshot)> = Vec::new();

    for message in messages {
        if !message.is_tool() {
            flush_images(&mut encoded, &mut pending);
        }
        let value = match message.role {
            Role::System => json!({ "role": "system", "content": message.text() }),
            Role::User => match message.image() {
                Some(image) => json!({
                    "role": "user",
                    "content": [
                        { "type": "text", "text": message.text() },
                        image_part(image),
                    ]
                }),
                None => json!({ "role": "user", "content": message.text() }),
            },
            Role::Assistant => {
                let mut value = json!({ "role": "assistant", "content": message.text() });
                if message.has_tool_calls() {
                    value["tool_calls"] = message
                        .tool_calls
                        .iter()
                        .map(|call| {
                            json!({
                                "id": call.id,
                                "type": "function",
                                "function": {
                                    "name": call.name,
                                    "arguments": call.arguments.to_string(),
                                }
                            })
                        })
                        .collect();
                }
                value
            }
            Role::Tool => {
                if let Some(image) = message.image() {
                    pending.push((message.name.as_deref().unwrap_or("tool"), image));
                }
                json!({
                    "role": "tool",
                    "tool_call_id": message.tool_call_id.as_deref().unwrap_or_default(),
                    "content": message.text(),
                })
            }
        };
        encoded.push(value);
    }
    flush_images(&mut encoded, &mut pending);
    encoded
}

fn flush_images(encoded: &mut Vec<Value>, pending: &mut Vec<(&str, &Screenshot)>) {
    if pending.is_empty() {
        return;
    }
    let mut parts = Vec::with_capacity(pending.len() * 2);
    for (name, image) in pending.drain(..) {
        parts.push(json!({ "type": "text", "text": format!("Screenshot after `{name}`:") }));
        parts.push(image_part(image));
    }
    encoded.push(json!({ "role": "user", "content": parts }));
}
