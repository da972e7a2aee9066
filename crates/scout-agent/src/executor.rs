use crate::backend::{ChatBackend, ChatReply, PromptMessage};
use crate::config::ModelConfig;
use crate::events::TurnEvent;
use crate::openai::OpenAiBackend;
use scout_core::{Role, ScoutError, ScoutResult, ToolStep, RECOVERY_TOOL};
use scout_tools::{ToolDescriptor, ToolRegistry};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = "You are Scout, a helpful chat assistant. You can call the \
     available tools when a question needs current or external information; otherwise \
     answer directly. After a tool result comes back, use it to give the user a concise \
     final answer.";

/// The completed result of one turn.
#[derive(Debug)]
pub struct TurnOutcome {
    /// The final answer text.
    pub answer: String,
    /// Every tool step recorded while answering, recovery markers included.
    pub steps: Vec<ToolStep>,
}

/// Boundary between the UI/session layer and the conversational agent.
///
/// Callers pass the prior transcript, the latest user text, and the tools
/// available this turn; they get back a final answer plus the ordered
/// trace, with live [`TurnEvent`]s arriving on `events` meanwhile. How the
/// answer is produced is opaque to the caller.
#[async_trait]
pub trait TurnExecutor: Send + Sync {
    /// Executes one turn.
    async fn execute(
        &self,
        history: &[(Role, String)],
        user_text: &str,
        tools: &ToolRegistry,
        events: mpsc::Sender<TurnEvent>,
    ) -> ScoutResult<TurnOutcome>;
}

/// Default executor: a bounded propose/execute loop over a chat backend.
///
/// Each round the model either answers (done) or requests tool calls; the
/// executor runs the calls, backfills the observations, and asks again.
/// Unknown tools and malformed arguments are recovered in-loop: the error
/// is fed back as the observation and recorded under the reserved recovery
/// name rather than aborting the turn.
pub struct ChatLoopExecutor {
    backend: Box<dyn ChatBackend>,
    streaming: bool,
    max_rounds: u32,
}

impl ChatLoopExecutor {
    /// Creates the executor with an [`OpenAiBackend`] for the given config.
    pub fn from_config(config: ModelConfig) -> Self {
        let streaming = config.streaming;
        let max_rounds = config.max_rounds;
        Self {
            backend: Box::new(OpenAiBackend::new(config)),
            streaming,
            max_rounds,
        }
    }

    /// Creates the executor from a pre-built backend (tests, custom wires).
    pub fn from_backend(backend: Box<dyn ChatBackend>, streaming: bool, max_rounds: u32) -> Self {
        Self {
            backend,
            streaming,
            max_rounds,
        }
    }

    async fn next_reply(
        &self,
        prompt: &[PromptMessage],
        descriptors: &[ToolDescriptor],
        events: &mpsc::Sender<TurnEvent>,
    ) -> ScoutResult<ChatReply> {
        if !self.streaming {
            return self.backend.complete(prompt, descriptors).await;
        }

        let (mut rx, handle) = self.backend.complete_stream(prompt, descriptors).await?;
        while let Some(delta) = rx.recv().await {
            let _ = events
                .send(TurnEvent::AnswerDelta { text: delta.text })
                .await;
        }
        handle
            .await
            .map_err(|e| ScoutError::Agent(format!("completion task failed: {e}")))?
    }
}

#[async_trait]
impl TurnExecutor for ChatLoopExecutor {
    async fn execute(
        &self,
        history: &[(Role, String)],
        user_text: &str,
        tools: &ToolRegistry,
        events: mpsc::Sender<TurnEvent>,
    ) -> ScoutResult<TurnOutcome> {
        let mut prompt = Vec::with_capacity(history.len() + 2);
        prompt.push(PromptMessage::system(SYSTEM_PROMPT));
        for (role, content) in history {
            prompt.push(match role {
                Role::User => PromptMessage::user(content.clone()),
                Role::Assistant => PromptMessage::assistant(content.clone()),
            });
        }
        prompt.push(PromptMessage::user(user_text));

        let descriptors: Vec<ToolDescriptor> =
            tools.descriptors().into_iter().cloned().collect();

        let mut steps: Vec<ToolStep> = Vec::new();

        for round in 0..self.max_rounds {
            info!(round, steps = steps.len(), "Turn round");

            match self.next_reply(&prompt, &descriptors, &events).await? {
                ChatReply::Answer(text) => {
                    info!(rounds = round + 1, steps = steps.len(), "Turn completed");
                    return Ok(TurnOutcome {
                        answer: text,
                        steps,
                    });
                }

                ChatReply::ToolUse { rationale, calls } => {
                    let log = rationale.clone().unwrap_or_default();
                    if let Some(text) = rationale {
                        prompt.push(PromptMessage::assistant(text));
                    }

                    for call in calls {
                        match tools.get(&call.name) {
                            Some(tool) if call.arguments.is_object() => {
                                let input = render_input(&call.arguments);
                                let _ = events
                                    .send(TurnEvent::StepStarted {
                                        tool: call.name.clone(),
                                        input: input.clone(),
                                        log: log.clone(),
                                    })
                                    .await;

                                let result = tool.invoke(call.clone()).await?;

                                let _ = events
                                    .send(TurnEvent::StepFinished {
                                        tool: call.name.clone(),
                                        output: result.content.clone(),
                                        is_error: result.is_error,
                                    })
                                    .await;

                                prompt.push(PromptMessage::user(observation(
                                    &call.name, &result.content, result.is_error,
                                )));
                                steps.push(ToolStep::new(
                                    &call.name,
                                    input,
                                    result.content,
                                    log.clone(),
                                ));
                            }

                            // Unknown tool or non-object arguments: feed the
                            // problem back and let the model try again. The
                            // recovery step stays out of rendered traces.
                            _ => {
                                let reason = if tools.get(&call.name).is_none() {
                                    format!("unknown tool '{}'", call.name)
                                } else {
                                    "arguments were not a JSON object".to_string()
                                };
                                warn!(tool = %call.name, %reason, "Recovering from bad tool call");

                                let note = format!("Could not run tool call: {reason}.");
                                prompt.push(PromptMessage::user(format!(
                                    "{note} Answer the user directly, or call one of \
                                     the available tools with valid JSON arguments."
                                )));
                                steps.push(ToolStep::new(
                                    RECOVERY_TOOL,
                                    serde_json::to_string(&call).unwrap_or_default(),
                                    note,
                                    log.clone(),
                                ));
                            }
                        }
                    }
                }
            }
        }

        warn!(max_rounds = self.max_rounds, "Turn exceeded round limit");
        Err(ScoutError::Agent(format!(
            "turn exceeded the limit of {} tool rounds",
            self.max_rounds
        )))
    }
}

/// Renders a call's arguments for display: the bare query when there is
/// one, compact JSON otherwise.
fn render_input(arguments: &serde_json::Value) -> String {
    match arguments["query"].as_str() {
        Some(query) => query.to_string(),
        None => arguments.to_string(),
    }
}

/// Backfilled observation message for the next completion round.
fn observation(tool: &str, content: &str, is_error: bool) -> String {
    serde_json::json!({
        "type": "tool_result",
        "tool": tool,
        "content": content,
        "is_error": is_error,
    })
    .to_string()
}
