use serde::{Deserialize, Serialize};

/// Reserved tool name for in-loop parse-error recovery steps.
///
/// When the model emits a tool call the loop cannot honor (unknown tool,
/// arguments that fail to parse), the recovery observation is recorded as a
/// step under this name. Such steps stay in the session store but are
/// excluded from rendered traces.
pub const RECOVERY_TOOL: &str = "_recovery";

/// A request from the model to invoke a specific tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier assigned by the model for this call.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON arguments to pass to the tool.
    pub arguments: serde_json::Value,
}

/// The result returned after executing a [`ToolCall`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The ID of the [`ToolCall`] this result corresponds to.
    pub call_id: String,
    /// The textual output produced by the tool.
    pub content: String,
    /// Whether the tool execution ended in an error.
    pub is_error: bool,
}

impl ToolResult {
    /// Creates a successful tool result.
    pub fn success(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    /// Creates an error tool result.
    pub fn error(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: true,
        }
    }
}

/// One completed tool invocation within an assistant turn.
///
/// Steps belong to exactly one assistant message and are stored in
/// execution order. They are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStep {
    /// Name of the invoked tool.
    pub tool: String,
    /// The input the tool was invoked with, rendered as text.
    pub input: String,
    /// The output the tool produced.
    pub output: String,
    /// Free-text rationale the model emitted alongside the call.
    pub log: String,
}

impl ToolStep {
    /// Creates a step record for a completed invocation.
    pub fn new(
        tool: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
        log: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            input: input.into(),
            output: output.into(),
            log: log.into(),
        }
    }

    /// Whether this step is an internal recovery marker hidden from traces.
    pub fn is_recovery(&self) -> bool {
        self.tool == RECOVERY_TOOL
    }
}
