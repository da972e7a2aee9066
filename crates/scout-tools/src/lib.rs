//! Tool capability interface and built-in tools for Scout.
//!
//! A tool is one named capability the agent may invoke while answering:
//! a descriptor (name, description, JSON parameter schema) plus an async
//! invocation function. Tools are looked up through a [`ToolRegistry`], so
//! adding a capability never changes the turn-execution contract.

/// The `Tool` trait and its descriptor.
pub mod tool;
/// Name-indexed tool registry.
pub mod registry;
/// Built-in web search tool.
pub mod search;

pub use registry::ToolRegistry;
pub use search::SearchTool;
pub use tool::{Tool, ToolDescriptor};

use std::sync::Arc;

/// Registers the default tool set: the web [`SearchTool`].
pub fn register_builtins(registry: &mut ToolRegistry) {
    registry.register(Arc::new(SearchTool::new()));
}
