//! Core types and error definitions for Scout.
//!
//! This crate provides the foundational types shared across all Scout
//! crates: error handling, transcript messages, and tool invocation
//! records.
//!
//! # Main types
//!
//! - [`ScoutError`] — Unified error enum for all Scout subsystems.
//! - [`ScoutResult`] — Convenience alias for `Result<T, ScoutError>`.
//! - [`Role`] — Message role (user or assistant).
//! - [`Message`] — A single message within the chat transcript.
//! - [`ToolCall`] — A model-initiated tool invocation request.
//! - [`ToolResult`] — The result of executing a tool call.
//! - [`ToolStep`] — One completed tool invocation as shown in a turn's trace.

/// Transcript message types.
pub mod message;
/// Tool invocation types.
pub mod tool;

pub use message::{Message, Role};
pub use tool::{ToolCall, ToolResult, ToolStep, RECOVERY_TOOL};

/// Top-level error type for Scout.
///
/// Each variant corresponds to a subsystem that can produce errors.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    /// The turn was attempted without an API credential configured.
    #[error("No API key configured — add your key in the sidebar to continue")]
    MissingCredential,

    /// An error originating from the turn execution loop.
    #[error("Agent error: {0}")]
    Agent(String),

    /// An error from an outbound HTTP request (e.g. the model endpoint).
    #[error("HTTP error: {0}")]
    Http(String),

    /// An error related to the session store.
    #[error("Session error: {0}")]
    Session(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error raised by a tool during invocation.
    #[error("Tool error: {0}")]
    Tool(String),

    /// An error from the web/WebSocket layer.
    #[error("Web error: {0}")]
    Web(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`ScoutError`].
pub type ScoutResult<T> = Result<T, ScoutError>;
