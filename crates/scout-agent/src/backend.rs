use scout_core::{ScoutResult, ToolCall};
use scout_tools::ToolDescriptor;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Role of a message in the prompt sent to the model.
///
/// Distinct from the transcript's `Role`: prompts additionally carry the
/// system instruction, and tool observations are backfilled as user
/// messages before the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole {
    /// System instruction.
    System,
    /// User input or backfilled tool observation.
    User,
    /// Prior assistant output.
    Assistant,
}

/// One message in the prompt.
#[derive(Debug, Clone)]
pub struct PromptMessage {
    /// The message's role.
    pub role: PromptRole,
    /// The message's text content.
    pub content: String,
}

impl PromptMessage {
    /// A system-role prompt message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    /// A user-role prompt message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    /// An assistant-role prompt message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }
}

/// What the model produced for one completion round.
#[derive(Debug)]
pub enum ChatReply {
    /// A final answer; the turn is done.
    Answer(String),
    /// The model wants tools run before answering.
    ToolUse {
        /// Free-text rationale emitted alongside the calls, if any.
        rationale: Option<String>,
        /// The requested tool invocations, in emission order.
        calls: Vec<ToolCall>,
    },
}

/// A fragment of streamed answer text.
#[derive(Debug, Clone)]
pub struct TokenDelta {
    /// The text fragment.
    pub text: String,
}

/// Seam to the hosted chat-completions API.
///
/// One implementation per wire protocol; tests substitute scripted
/// backends here without touching the loop above.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// One non-streaming completion round.
    async fn complete(
        &self,
        messages: &[PromptMessage],
        tools: &[ToolDescriptor],
    ) -> ScoutResult<ChatReply>;

    /// One streaming completion round.
    ///
    /// Returns a receiver of answer-text fragments and a join handle
    /// resolving to the same aggregated [`ChatReply`] the non-streaming
    /// path would have produced.
    async fn complete_stream(
        &self,
        messages: &[PromptMessage],
        tools: &[ToolDescriptor],
    ) -> ScoutResult<(mpsc::Receiver<TokenDelta>, JoinHandle<ScoutResult<ChatReply>>)>;
}
