use scout_core::{ScoutResult, ToolCall, ToolResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata describing a tool's interface to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// The name the model uses to invoke the tool.
    pub name: String,
    /// Human/model-readable description of what the tool does.
    pub description: String,
    /// JSON Schema of the tool's arguments.
    pub parameters_schema: serde_json::Value,
}

/// One invocable capability available to the agent.
///
/// Implementations report expected failures (bad arguments, upstream
/// errors) as error [`ToolResult`]s so the agent can feed them back to the
/// model; `Err` is reserved for faults the turn cannot continue through.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's descriptor.
    fn descriptor(&self) -> &ToolDescriptor;

    /// Executes one invocation of the tool.
    async fn invoke(&self, call: ToolCall) -> ScoutResult<ToolResult>;
}
