use crate::tool::{Tool, ToolDescriptor};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Central registry of the tools available to a turn.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers a tool under its descriptor name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.descriptor().name.clone();
        info!(tool = %name, "Registered tool");
        self.tools.insert(name, tool);
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Descriptors of all registered tools.
    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        self.tools.values().map(|t| t.descriptor()).collect()
    }

    /// Number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use scout_core::{ScoutResult, ToolCall, ToolResult};
    use async_trait::async_trait;

    struct EchoTool {
        descriptor: ToolDescriptor,
    }

    impl EchoTool {
        fn new() -> Self {
            Self {
                descriptor: ToolDescriptor {
                    name: "echo".to_string(),
                    description: "Echo the input back.".to_string(),
                    parameters_schema: serde_json::json!({
                        "type": "object",
                        "properties": {"text": {"type": "string"}},
                        "required": ["text"]
                    }),
                },
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.descriptor
        }

        async fn invoke(&self, call: ToolCall) -> ScoutResult<ToolResult> {
            let text = call.arguments["text"].as_str().unwrap_or_default();
            Ok(ToolResult::success(&call.id, text))
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool::new()));
        assert_eq!(registry.tool_count(), 1);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn descriptors_expose_schema() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool::new()));
        let descriptors = registry.descriptors();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "echo");
        assert_eq!(descriptors[0].parameters_schema["type"], "object");
    }

    #[tokio::test]
    async fn registered_tool_is_invocable() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool::new()));
        let call = ToolCall {
            id: "c1".to_string(),
            name: "echo".to_string(),
            arguments: serde_json::json!({"text": "ping"}),
        };
        let tool = registry.get("echo").unwrap();
        let result = tool.invoke(call).await.unwrap();
        assert_eq!(result.content, "ping");
        assert!(!result.is_error);
    }
}
