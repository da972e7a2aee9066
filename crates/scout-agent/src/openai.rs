use crate::backend::{ChatBackend, ChatReply, PromptMessage, PromptRole, TokenDelta};
use crate::config::ModelConfig;
use scout_core::{ScoutError, ScoutResult, ToolCall};
use scout_tools::ToolDescriptor;
use async_trait::async_trait;
use futures_util::StreamExt;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// OpenAI-compatible chat-completions backend.
///
/// Works against OpenAI itself and any endpoint speaking the same wire
/// protocol (the base URL is configuration, so self-hosted and proxy
/// deployments plug in unchanged).
pub struct OpenAiBackend {
    config: ModelConfig,
    http: reqwest::Client,
}

impl OpenAiBackend {
    /// Creates a backend for the given model configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url())
    }

    fn request_body(
        &self,
        messages: &[PromptMessage],
        tools: &[ToolDescriptor],
        stream: bool,
    ) -> serde_json::Value {
        let api_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        PromptRole::System => "system",
                        PromptRole::User => "user",
                        PromptRole::Assistant => "assistant",
                    },
                    "content": m.content,
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": self.config.model_id,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "messages": api_messages,
        });

        if !tools.is_empty() {
            let api_tools: Vec<serde_json::Value> = tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters_schema,
                        }
                    })
                })
                .collect();
            body["tools"] = serde_json::json!(api_tools);
        }

        if stream {
            body["stream"] = serde_json::json!(true);
        }

        body
    }

    async fn send(&self, body: &serde_json::Value) -> ScoutResult<reqwest::Response> {
        let resp = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ScoutError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            return Err(ScoutError::Http(format!(
                "model endpoint returned {status}: {detail}"
            )));
        }
        Ok(resp)
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn complete(
        &self,
        messages: &[PromptMessage],
        tools: &[ToolDescriptor],
    ) -> ScoutResult<ChatReply> {
        let body = self.request_body(messages, tools, false);
        let resp = self.send(&body).await?;
        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ScoutError::Http(e.to_string()))?;
        parse_reply(&json)
    }

    async fn complete_stream(
        &self,
        messages: &[PromptMessage],
        tools: &[ToolDescriptor],
    ) -> ScoutResult<(mpsc::Receiver<TokenDelta>, JoinHandle<ScoutResult<ChatReply>>)> {
        let body = self.request_body(messages, tools, true);
        let resp = self.send(&body).await?;

        let (tx, rx) = mpsc::channel::<TokenDelta>(64);
        let mut byte_stream = resp.bytes_stream();

        let handle = tokio::spawn(async move {
            let mut lines = String::new();
            let mut acc = ReplyAccumulator::default();

            while let Some(chunk) = byte_stream.next().await {
                let chunk =
                    chunk.map_err(|e| ScoutError::Http(format!("stream read error: {e}")))?;
                lines.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(end) = lines.find('\n') {
                    let line = lines[..end].trim().to_string();
                    lines.drain(..=end);

                    let Some(data) = line.strip_prefix("data: ") else {
                        continue;
                    };
                    if data == "[DONE]" {
                        continue;
                    }
                    let Ok(event) = serde_json::from_str::<serde_json::Value>(data) else {
                        continue;
                    };

                    if let Some(text) = acc.absorb(&event) {
                        let _ = tx.send(TokenDelta { text }).await;
                    }
                }
            }

            Ok(acc.finish())
        });

        Ok((rx, handle))
    }
}

/// Incrementally rebuilds a [`ChatReply`] from streamed delta events.
#[derive(Default)]
struct ReplyAccumulator {
    text: String,
    // Keyed by the wire's tool-call index so emission order survives.
    calls: BTreeMap<u64, (String, String, String)>,
}

impl ReplyAccumulator {
    /// Folds one SSE event in; returns any new answer text to forward.
    fn absorb(&mut self, event: &serde_json::Value) -> Option<String> {
        let delta = &event["choices"][0]["delta"];

        if let Some(tc_array) = delta["tool_calls"].as_array() {
            for tc in tc_array {
                let idx = tc["index"].as_u64().unwrap_or(0);
                let entry = self
                    .calls
                    .entry(idx)
                    .or_insert_with(|| (String::new(), String::new(), String::new()));
                if let Some(id) = tc["id"].as_str() {
                    entry.0 = id.to_string();
                }
                if let Some(name) = tc["function"]["name"].as_str() {
                    entry.1.push_str(name);
                }
                if let Some(args) = tc["function"]["arguments"].as_str() {
                    entry.2.push_str(args);
                }
            }
        }

        match delta["content"].as_str() {
            Some(content) if !content.is_empty() => {
                self.text.push_str(content);
                Some(content.to_string())
            }
            _ => None,
        }
    }

    fn finish(self) -> ChatReply {
        if self.calls.is_empty() {
            return ChatReply::Answer(self.text);
        }

        let calls = self
            .calls
            .into_values()
            .map(|(id, name, args)| ToolCall {
                id,
                name,
                arguments: serde_json::from_str(&args).unwrap_or(serde_json::Value::Null),
            })
            .collect();

        ChatReply::ToolUse {
            rationale: if self.text.is_empty() {
                None
            } else {
                Some(self.text)
            },
            calls,
        }
    }
}

/// Parses a non-streaming chat-completions response.
pub(crate) fn parse_reply(body: &serde_json::Value) -> ScoutResult<ChatReply> {
    let message = &body["choices"][0]["message"];
    if message.is_null() {
        return Err(ScoutError::Http(format!(
            "malformed completion response: {body}"
        )));
    }

    let content = message["content"].as_str().unwrap_or_default().to_string();

    let Some(raw_calls) = message["tool_calls"].as_array() else {
        return Ok(ChatReply::Answer(content));
    };

    let calls: Vec<ToolCall> = raw_calls
        .iter()
        .filter_map(|tc| {
            let id = tc["id"].as_str()?.to_string();
            let name = tc["function"]["name"].as_str()?.to_string();
            let arguments = tc["function"]["arguments"]
                .as_str()
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or(serde_json::Value::Null);
            Some(ToolCall {
                id,
                name,
                arguments,
            })
        })
        .collect();

    if calls.is_empty() {
        return Ok(ChatReply::Answer(content));
    }

    Ok(ChatReply::ToolUse {
        rationale: if content.is_empty() {
            None
        } else {
            Some(content)
        },
        calls,
    })
}
